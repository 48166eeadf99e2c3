use crate::Value;

/// Outcome of feeding one byte to the literal matcher.
#[derive(Debug, PartialEq)]
pub enum Step {
    /// Byte matched, more to come.
    NeedMore,
    /// Byte matched and completed the literal.
    Done(Value),
    /// Byte did not match.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Literal {
    Null,
    True,
    False,
}

/// Matches the remainder of `true`, `false` or `null` byte by byte, across
/// chunk boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LiteralMatcher(Option<(&'static [u8], Literal)>);

impl LiteralMatcher {
    /// Starts a literal after its first byte (`t`, `f` or `n`).
    pub fn start(first: u8) -> Self {
        match first {
            b'n' => Self(Some((b"ull", Literal::Null))),
            b't' => Self(Some((b"rue", Literal::True))),
            b'f' => Self(Some((b"alse", Literal::False))),
            _ => Self(None),
        }
    }

    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }

    pub fn step(&mut self, byte: u8) -> Step {
        let Some((expected, literal)) = self.0 else {
            return Step::Reject;
        };
        let Some((&head, rest)) = expected.split_first() else {
            return Step::Reject;
        };
        if head != byte {
            return Step::Reject;
        }
        if rest.is_empty() {
            self.0 = None;
            Step::Done(match literal {
                Literal::Null => Value::Null,
                Literal::True => Value::Boolean(true),
                Literal::False => Value::Boolean(false),
            })
        } else {
            self.0 = Some((rest, literal));
            Step::NeedMore
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &[u8]) -> Step {
        let mut matcher = LiteralMatcher::start(input[0]);
        let mut last = Step::Reject;
        for &b in &input[1..] {
            last = matcher.step(b);
            if last != Step::NeedMore {
                break;
            }
        }
        last
    }

    #[test]
    fn matches_all_three() {
        assert_eq!(run(b"true"), Step::Done(Value::Boolean(true)));
        assert_eq!(run(b"false"), Step::Done(Value::Boolean(false)));
        assert_eq!(run(b"null"), Step::Done(Value::Null));
    }

    #[test]
    fn mismatch_rejects() {
        assert_eq!(run(b"nul1"), Step::Reject);
        assert_eq!(run(b"tRue"), Step::Reject);
        assert_eq!(run(b"fals"), Step::NeedMore);
    }

    #[test]
    fn finished_matcher_rejects_further_bytes() {
        let mut matcher = LiteralMatcher::start(b'n');
        for b in *b"ull" {
            let _ = matcher.step(b);
        }
        assert!(!matcher.is_active());
        assert_eq!(matcher.step(b'l'), Step::Reject);
        assert!(!LiteralMatcher::start(b'x').is_active());
    }
}
