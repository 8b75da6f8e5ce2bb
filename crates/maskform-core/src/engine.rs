//! The masking engine.
//!
//! Every edit is resolved from scratch: the candidate string (the prior value
//! with the edit applied) is re-walked against the mask from its first token,
//! so the result depends only on `(tokens, prior, caret, event)`. There is no
//! parser state carried between calls.
//!
//! Positions and lengths are measured in `char`s.
//!
//! # Example
//!
//! ```
//! use maskform_core::engine::apply;
//! use maskform_core::mask::compile;
//! use maskform_core::EditEvent;
//!
//! let tokens = compile("99/99/9999");
//! let typed = apply(&tokens, "12", 2, &EditEvent::Keystroke('3'));
//! assert_eq!(typed.value, "12/3");
//! assert_eq!(typed.caret, 4);
//! assert!(!typed.had_error);
//! ```

use crate::event::{EditEvent, Resolution};
use crate::logging::targets;
use crate::mask::{LiteralCompletion, Mask, MaskToken};

/// Resolve one edit against a token sequence, inserting literals lazily.
pub fn apply(
    tokens: &[MaskToken],
    prior: &str,
    caret_before: usize,
    event: &EditEvent,
) -> Resolution {
    apply_with(tokens, LiteralCompletion::Lazy, prior, caret_before, event)
}

/// Resolve one edit against a token sequence with an explicit completion mode.
///
/// A caret beyond the end of `prior` is treated as the end of the value.
pub fn apply_with(
    tokens: &[MaskToken],
    completion: LiteralCompletion,
    prior: &str,
    caret_before: usize,
    event: &EditEvent,
) -> Resolution {
    let prior: Vec<char> = prior.chars().collect();
    let caret = caret_before.min(prior.len());

    let resolution = if tokens.is_empty() {
        pass_through(&prior, caret, event)
    } else {
        match *event {
            EditEvent::Keystroke(ch) => keystroke(tokens, completion, &prior, caret, ch),
            EditEvent::Backspace => backspace(tokens, &prior, caret),
            EditEvent::Paste | EditEvent::Blur => terminal(tokens, &prior, caret),
        }
    };

    tracing::trace!(
        target: targets::ENGINE,
        %event,
        caret_before,
        caret = resolution.caret,
        valid_length = resolution.valid_length,
        had_error = resolution.had_error,
        "resolved edit"
    );

    resolution
}

impl Mask {
    /// Resolve one edit against this mask using its completion mode.
    pub fn apply(&self, prior: &str, caret_before: usize, event: &EditEvent) -> Resolution {
        apply_with(self.tokens(), self.completion(), prior, caret_before, event)
    }

    /// Length of the prefix of `value` that satisfies this mask.
    pub fn valid_length(&self, value: &str) -> usize {
        if self.is_empty() {
            return value.chars().count();
        }
        let value: Vec<char> = value.chars().collect();
        scan(self.tokens(), &value, None).valid_length
    }
}

/// Result of walking a candidate string against the tokens.
#[derive(Debug)]
struct Scan {
    output: Vec<char>,
    /// Index of the first token not yet consumed.
    next_token: usize,
    valid_length: usize,
    failed: bool,
    /// Output length just after the character at the tracked candidate index.
    typed_end: Option<usize>,
    /// Per scanned candidate char, whether it matched a literal token.
    matched_literal: Vec<bool>,
}

fn scan(tokens: &[MaskToken], candidate: &[char], typed_at: Option<usize>) -> Scan {
    let mut output = Vec::with_capacity(tokens.len());
    let mut pos = 0;
    let mut valid_length = 0;
    let mut typed_end = None;
    let mut failed = false;
    let mut matched_literal = Vec::with_capacity(candidate.len());

    'chars: for (index, &ch) in candidate.iter().enumerate() {
        let accepted = output.len();
        let value_bearing = loop {
            let Some(token) = tokens.get(pos) else {
                output.truncate(accepted);
                failed = true;
                break 'chars;
            };
            pos += 1;
            match *token {
                MaskToken::Literal(lit) if lit == ch => break false,
                MaskToken::Literal(lit) => output.push(lit),
                MaskToken::Required(class) | MaskToken::Optional(class) if class.accepts(ch) => {
                    break true;
                }
                MaskToken::Required(_) => {
                    output.truncate(accepted);
                    failed = true;
                    break 'chars;
                }
                MaskToken::Optional(_) => {}
            }
        };

        output.push(ch);
        matched_literal.push(!value_bearing);
        if value_bearing {
            valid_length = output.len();
        }
        if typed_at == Some(index) {
            typed_end = Some(output.len());
        }
    }

    // Literals that close the mask belong to the valid prefix.
    if !failed && !tokens[pos..].iter().any(MaskToken::is_value_bearing) {
        valid_length = output.len();
    }

    Scan {
        output,
        next_token: pos,
        valid_length,
        failed,
        typed_end,
        matched_literal,
    }
}

fn requires_more(tokens: &[MaskToken], from: usize) -> bool {
    tokens[from..].iter().any(MaskToken::is_required)
}

fn keystroke(
    tokens: &[MaskToken],
    completion: LiteralCompletion,
    prior: &[char],
    caret: usize,
    ch: char,
) -> Resolution {
    let mut candidate = prior.to_vec();
    candidate.insert(caret, ch);

    let mut walk = scan(tokens, &candidate, Some(caret));
    if walk.failed {
        // Separators after the caret no longer line up once a character is
        // inserted before them; lay the remaining characters out again.
        let reflowed = scan(tokens, &reflow_candidate(tokens, prior, caret, ch), Some(caret));
        if reflowed.typed_end.is_some() {
            walk = reflowed;
        }
    }

    if walk.typed_end.is_none() {
        let absorbed = completion == LiteralCompletion::Eager
            && repeats_completed_literal(tokens, prior, caret, ch);
        if absorbed {
            tracing::trace!(target: targets::ENGINE, ch = ?ch, caret, "absorbed typed separator");
        } else {
            tracing::debug!(target: targets::ENGINE, ch = ?ch, caret, "keystroke rejected");
        }
        return Resolution {
            value: prior.iter().collect(),
            caret,
            valid_length: scan(tokens, prior, None).valid_length,
            had_error: !absorbed,
        };
    }
    if walk.failed {
        tracing::trace!(
            target: targets::ENGINE,
            ch = ?ch,
            caret,
            kept = walk.output.len(),
            "dropped characters pushed past the mask"
        );
    }

    let mut new_caret = walk.typed_end.unwrap_or(caret);
    if completion == LiteralCompletion::Eager && walk.output.len() > prior.len() {
        let typed_last = new_caret == walk.output.len();
        let appended = complete_literals(tokens, &mut walk);
        if typed_last {
            new_caret += appended;
        }
    }

    Resolution {
        value: walk.output.iter().collect(),
        caret: new_caret,
        valid_length: walk.valid_length,
        had_error: false,
    }
}

/// The prior value with `ch` inserted at the caret and every character after
/// the caret that sat on a literal token removed.
fn reflow_candidate(tokens: &[MaskToken], prior: &[char], caret: usize, ch: char) -> Vec<char> {
    let layout = scan(tokens, prior, None);
    let on_literal = |index: usize| layout.matched_literal.get(index).copied().unwrap_or(false);
    let mut candidate = Vec::with_capacity(prior.len() + 1);
    candidate.extend_from_slice(&prior[..caret]);
    candidate.push(ch);
    candidate.extend(
        prior[caret..]
            .iter()
            .enumerate()
            .filter(|&(offset, _)| !on_literal(caret + offset))
            .map(|(_, &c)| c),
    );
    candidate
}

/// Whether `ch` is one of the separators in the literal run ending at the caret.
///
/// With eager completion the separator is already on screen when the user
/// types it, so the keystroke is a no-op rather than a mismatch.
fn repeats_completed_literal(
    tokens: &[MaskToken],
    prior: &[char],
    caret: usize,
    ch: char,
) -> bool {
    prior[..caret]
        .iter()
        .rev()
        .take_while(|&&c| tokens.contains(&MaskToken::Literal(c)))
        .any(|&c| c == ch)
}

/// Append the literals between the scan position and the next value-bearing
/// token, provided the mask still needs input. Returns how many were added.
fn complete_literals(tokens: &[MaskToken], scan: &mut Scan) -> usize {
    let starts_with_literal = tokens
        .get(scan.next_token)
        .is_some_and(MaskToken::is_literal);
    if !starts_with_literal || !requires_more(tokens, scan.next_token) {
        return 0;
    }

    let mut appended = 0;
    while let Some(MaskToken::Literal(lit)) = tokens.get(scan.next_token) {
        scan.output.push(*lit);
        scan.next_token += 1;
        appended += 1;
    }
    appended
}

fn backspace(tokens: &[MaskToken], prior: &[char], caret: usize) -> Resolution {
    if caret == 0 {
        return Resolution {
            value: prior.iter().collect(),
            caret,
            valid_length: scan(tokens, prior, None).valid_length,
            had_error: false,
        };
    }

    let mut value = prior.to_vec();
    value.remove(caret - 1);

    Resolution {
        valid_length: scan(tokens, &value, None).valid_length,
        value: value.iter().collect(),
        caret: caret - 1,
        had_error: false,
    }
}

fn terminal(tokens: &[MaskToken], prior: &[char], caret: usize) -> Resolution {
    let Scan {
        mut output,
        next_token,
        valid_length,
        failed,
        ..
    } = scan(tokens, prior, None);

    output.truncate(valid_length);
    let unfilled = !output.is_empty() && requires_more(tokens, next_token);

    Resolution {
        caret: caret.min(output.len()),
        value: output.into_iter().collect(),
        valid_length,
        had_error: failed || unfilled,
    }
}

fn pass_through(prior: &[char], caret: usize, event: &EditEvent) -> Resolution {
    let mut value = prior.to_vec();
    let caret = match *event {
        EditEvent::Keystroke(ch) => {
            value.insert(caret, ch);
            caret + 1
        }
        EditEvent::Backspace if caret > 0 => {
            value.remove(caret - 1);
            caret - 1
        }
        _ => caret,
    };

    Resolution {
        valid_length: value.len(),
        value: value.into_iter().collect(),
        caret,
        had_error: false,
    }
}
