/*
 * strip.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Envelope stripping for include-contents-only insertion.
//!
//! A selected fragment arrives wrapped in the element that matched the
//! selector. Including only its contents means removing that envelope, along
//! with anything else sitting at the envelope's own level, while leaving the
//! interior untouched.

use crate::event::TemplateEvent;

/// Return the events of `events` with the top-level envelope removed.
///
/// A single backward scan keeps a signed nesting level:
///
/// - unmatched close tags are kept and do not touch the level;
/// - a matched close tag is dropped when the level is `<= 0`, then the level
///   goes up;
/// - an open tag lowers the level and is dropped when the result is `<= 0`;
/// - any other event is dropped when the level is `<= 0`.
///
/// Every top-level open/close pair is removed, so a multi-rooted selection
/// loses all of its envelopes. Applying this twice strips the next level.
pub fn strip_envelope(events: &[TemplateEvent]) -> Vec<TemplateEvent> {
    let mut keep = vec![true; events.len()];
    let mut level: i32 = 0;

    for (index, event) in events.iter().enumerate().rev() {
        match event {
            TemplateEvent::CloseTag {
                unmatched: true, ..
            } => {}
            TemplateEvent::CloseTag { .. } => {
                if level <= 0 {
                    keep[index] = false;
                }
                level += 1;
            }
            TemplateEvent::OpenTag(_) => {
                level -= 1;
                if level <= 0 {
                    keep[index] = false;
                }
            }
            _ => {
                if level <= 0 {
                    keep[index] = false;
                }
            }
        }
    }

    events
        .iter()
        .zip(keep)
        .filter_map(|(event, kept)| kept.then(|| event.clone()))
        .collect()
}
