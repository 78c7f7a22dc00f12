use std::fmt;

/// A literal that could not be read back, with the byte offset where
/// parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    offset: usize,
    expected: Option<String>,
}

impl ParseError {
    pub(crate) fn at(offset: usize, expected: Option<String>) -> Self {
        Self { offset, expected }
    }

    /// Byte offset into the input where parsing failed.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// What the grammar expected at [`offset()`](Self::offset), if known.
    #[must_use]
    pub fn expected(&self) -> Option<&str> {
        self.expected.as_deref()
    }
}

impl<I, E> From<winnow::error::ParseError<I, E>> for ParseError
where
    E: fmt::Display,
{
    fn from(err: winnow::error::ParseError<I, E>) -> Self {
        let expected = err.inner().to_string();
        Self::at(err.offset(), (!expected.is_empty()).then_some(expected))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid literal at offset {}", self.offset)?;
        if let Some(expected) = &self.expected {
            write!(f, ": {expected}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}
