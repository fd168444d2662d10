//! Acceptance gates for an assembled candidate fragment.
//!
//! Two independent checks run before a candidate is accepted:
//!
//! * [`is_well_formed`] — syntactic validity only. The fragment must parse
//!   inside a synthetic root element; no schema is involved. Parse failures
//!   are a verdict, never an error.
//! * [`content_missing`] — a byte-ratio proxy for "the model dropped
//!   content". XML markup inflates the candidate relative to the source, so
//!   the gate is lenient in practice, but a summarised or truncated page
//!   falls well below the threshold.

use quick_xml::events::Event;
use quick_xml::Reader;

/// Report whether `fragment` is well-formed when wrapped in a synthetic root.
///
/// The wrapping root makes multi-element fragments (the normal case: one
/// element per chunk) a single parseable document. An empty fragment is
/// well-formed — an empty root element is valid XML.
pub fn is_well_formed(fragment: &str) -> bool {
    let wrapped = format!("<root>{fragment}</root>");
    let mut reader = Reader::from_str(&wrapped);

    // The reader checks tag nesting; entity and attribute syntax only get
    // validated on unescape, so drive both explicitly.
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => return true,
            Ok(Event::Start(e) | Event::Empty(e)) => {
                for attr in e.attributes() {
                    match attr {
                        Ok(a) => {
                            if a.unescape_value().is_err() {
                                return false;
                            }
                        }
                        Err(_) => return false,
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if t.unescape().is_err() {
                    return false;
                }
            }
            Ok(_) => {}
            Err(_) => return false,
        }
    }
}

/// Report whether `candidate` appears to have lost content relative to
/// `original`, by UTF-8 byte-length ratio against `threshold`.
///
/// An empty original never has missing content. This is a deliberately crude
/// proxy carried over from the reference behaviour: markup bytes in the
/// candidate make the comparison lenient, and the gate exists to catch gross
/// truncation, not subtle edits.
pub fn content_missing(original: &str, candidate: &str, threshold: f64) -> bool {
    if original.is_empty() {
        return false;
    }
    (candidate.len() as f64 / original.len() as f64) < threshold
}
