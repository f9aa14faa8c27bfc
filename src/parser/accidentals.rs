use crate::parser::key_signature::{Accidental, KeySignature, Step};
use crate::parser::score_reader::read_score;
use crate::ScoreError;
use roxmltree::{Document, Node, ParsingOptions};
use std::path::Path;

const KEY: &str = "key";
const FIFTHS: &str = "fifths";
const NOTE: &str = "note";
const PITCH: &str = "pitch";
const STEP: &str = "step";
const ACCIDENTAL: &str = "accidental";

/// Text to insert at a byte offset of the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Insertion {
    offset: usize,
    text: String,
}

/// Make the accidentals implied by the key signature explicit.
///
/// Every `<note>` with a pitch and no `<accidental>` child gets one appended when the
/// active key signature alters its step. The active signature is the last `<key>`
/// seen in document order, C major before the first one. The rest of the document
/// is returned unchanged, so annotating twice gives the same text as annotating once.
pub fn annotate_accidentals(xml: &str) -> Result<String, ScoreError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(xml, options)?;

    let mut insertions = Vec::new();
    let final_key = annotate_element(
        document.root_element(),
        KeySignature::default(),
        &mut insertions,
    );
    log::debug!(
        "Adding {} accidentals, final key signature {final_key}",
        insertions.len()
    );

    Ok(splice(xml, &insertions))
}

pub fn annotate_accidentals_in_file(path: &Path) -> Result<String, ScoreError> {
    let xml = read_score(path)?;
    annotate_accidentals(&xml)
}

/// Pre-order walk returning the key signature active after `element`.
fn annotate_element(
    element: Node,
    mut key: KeySignature,
    insertions: &mut Vec<Insertion>,
) -> KeySignature {
    match element.tag_name().name() {
        KEY => key = read_key_signature(element).unwrap_or(key),
        NOTE => insertions.extend(plan_accidental(element, key)),
        _ => {}
    }
    for child in element.children().filter(Node::is_element) {
        key = annotate_element(child, key, insertions);
    }
    key
}

fn read_key_signature(key: Node) -> Option<KeySignature> {
    let fifths = child_element(key, FIFTHS)?;
    let text = fifths.text().unwrap_or_default();
    let signature = KeySignature::parse_fifths(text);
    match signature {
        Some(signature) => log::debug!("Key signature changed to {signature}"),
        None => log::warn!("Ignoring key signature with invalid fifths {text:?}"),
    }
    signature
}

fn plan_accidental(note: Node, key: KeySignature) -> Option<Insertion> {
    if child_element(note, ACCIDENTAL).is_some() {
        return None;
    }
    let step = child_element(note, PITCH)
        .and_then(|pitch| child_element(pitch, STEP))
        .and_then(|step| step.text())
        .and_then(|letter| Step::from_letter(letter.trim()))?;
    let accidental = key.accidental_for(step)?;
    let last_child = note.last_element_child()?;
    Some(Insertion {
        offset: last_child.range().end,
        text: format!("{}{}", indentation_before(last_child), accidental_element(accidental)),
    })
}

fn accidental_element(accidental: Accidental) -> String {
    format!("<{ACCIDENTAL}>{accidental}</{ACCIDENTAL}>")
}

/// Whitespace separating `node` from its previous sibling, reused so inserted
/// elements line up with their siblings. Sliced from the source text since text
/// nodes have their line endings normalized.
fn indentation_before<'input>(node: Node<'_, 'input>) -> &'input str {
    node.prev_sibling()
        .filter(Node::is_text)
        .and_then(|text| node.document().input_text().get(text.range()))
        .filter(|text| text.trim().is_empty())
        .unwrap_or_default()
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == name)
}

fn splice(xml: &str, insertions: &[Insertion]) -> String {
    let extra: usize = insertions.iter().map(|i| i.text.len()).sum();
    let mut output = String::with_capacity(xml.len() + extra);
    let mut cursor = 0;
    for insertion in insertions {
        output.push_str(&xml[cursor..insertion.offset]);
        output.push_str(&insertion.text);
        cursor = insertion.offset;
    }
    output.push_str(&xml[cursor..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score_in_key(fifths: &str, notes: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<score-partwise version="3.1">
  <part id="P1">
    <measure number="1">
      <attributes>
        <key>
          <fifths>{fifths}</fifths>
        </key>
      </attributes>{notes}
    </measure>
  </part>
</score-partwise>"#
        )
    }

    fn note(step: &str, extra: &str) -> String {
        format!(
            r#"
      <note>
        <pitch>
          <step>{step}</step>
          <octave>4</octave>
        </pitch>
        <duration>4</duration>
        <type>whole</type>{extra}
      </note>"#
        )
    }

    fn occurrences(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_c_major_adds_nothing() {
        let xml = score_in_key("0", &note("C", ""));
        let result = annotate_accidentals(&xml).unwrap();
        assert_eq!(result, xml);
    }

    #[test]
    fn test_g_major_sharpens_f_only() {
        let xml = score_in_key("1", &(note("F", "") + &note("C", "")));
        let result = annotate_accidentals(&xml).unwrap();
        assert_eq!(occurrences(&result, "<accidental>sharp</accidental>"), 1);
        let f_note = result.find("<step>F</step>").unwrap();
        let c_note = result.find("<step>C</step>").unwrap();
        let accidental = result.find("<accidental>").unwrap();
        assert!(f_note < accidental && accidental < c_note);
    }

    #[test]
    fn test_f_major_flattens_b() {
        let xml = score_in_key("-1", &note("B", ""));
        let result = annotate_accidentals(&xml).unwrap();
        assert!(result.contains("<accidental>flat</accidental>"));
    }

    #[test]
    fn test_accidental_appended_with_sibling_indentation() {
        let xml = score_in_key("1", &note("F", ""));
        let result = annotate_accidentals(&xml).unwrap();
        let expected = xml.replace(
            "<type>whole</type>",
            "<type>whole</type>\n        <accidental>sharp</accidental>",
        );
        assert_eq!(result, expected);
    }

    #[test]
    fn test_crlf_line_endings_are_kept() {
        let xml = score_in_key("1", &note("F", "")).replace('\n', "\r\n");
        let result = annotate_accidentals(&xml).unwrap();
        assert!(result.contains("<type>whole</type>\r\n        <accidental>sharp</accidental>"));
        assert_eq!(occurrences(&result, "\n"), occurrences(&result, "\r\n"));
        assert_eq!(annotate_accidentals(&result).unwrap(), result);
    }

    #[test]
    fn test_existing_accidental_is_preserved() {
        let xml = score_in_key("-1", &note("B", "\n        <accidental>natural</accidental>"));
        let result = annotate_accidentals(&xml).unwrap();
        assert_eq!(result, xml);
    }

    #[test]
    fn test_multiple_sharps() {
        let xml = score_in_key("2", &(note("F", "") + &note("C", "") + &note("G", "")));
        let result = annotate_accidentals(&xml).unwrap();
        assert_eq!(occurrences(&result, "<accidental>sharp</accidental>"), 2);
    }

    #[test]
    fn test_rest_is_skipped() {
        let rest = "\n      <note><rest/><duration>4</duration><type>whole</type></note>";
        let xml = score_in_key("7", rest);
        assert_eq!(annotate_accidentals(&xml).unwrap(), xml);
    }

    #[test]
    fn test_key_change_persists_across_measures_and_parts() {
        let xml = r#"<score-partwise>
  <part id="P1">
    <measure number="1">
      <note><pitch><step>B</step><octave>4</octave></pitch></note>
      <attributes><key><fifths>-2</fifths></key></attributes>
      <note><pitch><step>E</step><octave>4</octave></pitch></note>
    </measure>
    <measure number="2">
      <note><pitch><step>B</step><octave>4</octave></pitch></note>
      <attributes><key><fifths>3</fifths></key></attributes>
    </measure>
  </part>
  <part id="P2">
    <measure number="1">
      <note><pitch><step>G</step><octave>4</octave></pitch></note>
    </measure>
  </part>
</score-partwise>"#;
        let result = annotate_accidentals(xml).unwrap();
        assert_eq!(occurrences(&result, "<accidental>flat</accidental>"), 2);
        assert_eq!(occurrences(&result, "<accidental>sharp</accidental>"), 1);
        assert!(result.contains("<octave>4</octave></pitch><accidental>sharp</accidental></note>"));
        assert!(result.starts_with(
            "<score-partwise>\n  <part id=\"P1\">\n    <measure number=\"1\">\n      <note><pitch><step>B</step><octave>4</octave></pitch></note>"
        ));
    }

    #[test]
    fn test_invalid_fifths_keeps_active_key() {
        let xml = r#"<score-partwise><part><measure>
<attributes><key><fifths>1</fifths></key></attributes>
<attributes><key><fifths>sharp</fifths></key></attributes>
<note><pitch><step>F</step></pitch></note>
</measure></part></score-partwise>"#;
        let result = annotate_accidentals(xml).unwrap();
        assert_eq!(occurrences(&result, "<accidental>sharp</accidental>"), 1);
    }

    #[test]
    fn test_out_of_range_key_uses_every_letter() {
        let xml = score_in_key("-9", &note("F", ""));
        let result = annotate_accidentals(&xml).unwrap();
        assert!(result.contains("<accidental>flat</accidental>"));
    }

    #[test]
    fn test_annotation_is_idempotent() {
        let xml = score_in_key("4", &(note("F", "") + &note("D", "") + &note("E", "")));
        let once = annotate_accidentals(&xml).unwrap();
        let twice = annotate_accidentals(&once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(occurrences(&once, "<accidental>"), 2);
    }

    #[test]
    fn test_doctype_is_accepted() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 3.1 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">
<score-partwise><part><measure><attributes><key><fifths>1</fifths></key></attributes>
<note><pitch><step>F</step></pitch></note></measure></part></score-partwise>"#;
        let result = annotate_accidentals(xml).unwrap();
        assert!(result.starts_with("<?xml"));
        assert!(result.contains("<!DOCTYPE score-partwise"));
        assert!(result.contains("<accidental>sharp</accidental>"));
    }

    #[test]
    fn test_malformed() {
        let err = annotate_accidentals("This is not valid XML").unwrap_err();
        assert!(matches!(err, ScoreError::MalformedDocument(_)));
    }
}
