use super::Token;

/// Outcome of feeding one byte to an [`ExpectedLiteralBuffer`].
#[derive(Debug, PartialEq)]
pub(crate) enum Step {
    NeedMore,
    /// The byte completed the literal.
    Done(Token<'static>),
    Reject,
}

/// Matches the tail of `null`, `true` or `false` once the first byte has
/// been seen.
#[derive(Debug, Clone)]
pub(crate) struct ExpectedLiteralBuffer {
    rest: &'static [u8],
    token: Option<Token<'static>>,
}

impl ExpectedLiteralBuffer {
    pub(crate) fn new(first: u8) -> Self {
        let (rest, token): (&'static [u8], _) = match first {
            b'n' => (b"ull", Some(Token::Null)),
            b't' => (b"rue", Some(Token::Bool(true))),
            b'f' => (b"alse", Some(Token::Bool(false))),
            _ => (b"", None),
        };
        Self { rest, token }
    }

    pub(crate) fn step(&mut self, b: u8) -> Step {
        match self.rest.split_first() {
            Some((&expected, rest)) if expected == b => {
                self.rest = rest;
                match (rest.is_empty(), self.token.take()) {
                    (false, token) => {
                        self.token = token;
                        Step::NeedMore
                    }
                    (true, Some(token)) => Step::Done(token),
                    (true, None) => Step::Reject,
                }
            }
            _ => Step::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(first: u8, tail: &[u8]) -> Vec<Step> {
        let mut literal = ExpectedLiteralBuffer::new(first);
        tail.iter().map(|&b| literal.step(b)).collect()
    }

    #[test]
    fn completes_each_literal() {
        assert_eq!(feed(b'n', b"ull").pop(), Some(Step::Done(Token::Null)));
        assert_eq!(feed(b't', b"rue").pop(), Some(Step::Done(Token::Bool(true))));
        assert_eq!(
            feed(b'f', b"alse"),
            [Step::NeedMore, Step::NeedMore, Step::NeedMore, Step::Done(Token::Bool(false))]
        );
    }

    #[test]
    fn rejects_wrong_bytes() {
        assert_eq!(feed(b't', b"ru!"), [Step::NeedMore, Step::NeedMore, Step::Reject]);
        assert_eq!(feed(b'x', b"a"), [Step::Reject]);
    }
}
