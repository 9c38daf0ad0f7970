use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Dotted address into nested form values: `referee1.name`, `rows[0].path`,
/// `["key.with.dots"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ValuePath {
    segments: Vec<PathSegment>,
}

impl ValuePath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        self.segments.as_slice()
    }

    pub fn parse(input: &str) -> Result<Self, ValuePathParseError> {
        let chars: Vec<char> = input.trim().chars().collect();
        let mut idx = 0usize;
        let mut out = Vec::<PathSegment>::new();

        while idx < chars.len() {
            match chars[idx] {
                '.' if out.is_empty() => {
                    return Err(ValuePathParseError::new("path cannot start with '.'"));
                }
                '.' => {
                    idx += 1;
                    out.push(PathSegment::Key(parse_key(&chars, &mut idx)?));
                }
                '[' => out.push(parse_bracket_segment(&chars, &mut idx)?),
                _ if out.is_empty() => out.push(PathSegment::Key(parse_key(&chars, &mut idx)?)),
                ch => {
                    return Err(ValuePathParseError::new(format!(
                        "unexpected character '{}' at position {}",
                        ch, idx
                    )));
                }
            }
        }

        Ok(Self::new(out))
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if is_identifier(key) => {
                    if idx > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                PathSegment::Key(key) => {
                    f.write_str("[\"")?;
                    f.write_str(key.replace('\\', "\\\\").replace('"', "\\\"").as_str())?;
                    f.write_str("\"]")?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuePathParseError {
    message: String,
}

impl ValuePathParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValuePathParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message.as_str())
    }
}

impl std::error::Error for ValuePathParseError {}

fn parse_key(chars: &[char], idx: &mut usize) -> Result<String, ValuePathParseError> {
    let start = *idx;
    while *idx < chars.len() && !matches!(chars[*idx], '.' | '[' | ']') {
        *idx += 1;
    }
    if *idx == start {
        return Err(ValuePathParseError::new(format!(
            "expected key at position {}",
            start
        )));
    }
    Ok(chars[start..*idx].iter().collect())
}

fn parse_bracket_segment(
    chars: &[char],
    idx: &mut usize,
) -> Result<PathSegment, ValuePathParseError> {
    // caller guarantees chars[*idx] == '['
    *idx += 1;
    let Some(&first) = chars.get(*idx) else {
        return Err(ValuePathParseError::new("unterminated '[' segment"));
    };

    if first == '"' || first == '\'' {
        *idx += 1;
        let mut key = String::new();
        let mut closed = false;
        while let Some(&c) = chars.get(*idx) {
            *idx += 1;
            if c == '\\' {
                let Some(&escaped) = chars.get(*idx) else {
                    return Err(ValuePathParseError::new("unterminated escape in quoted key"));
                };
                key.push(escaped);
                *idx += 1;
                continue;
            }
            if c == first {
                closed = true;
                break;
            }
            key.push(c);
        }
        if !closed {
            return Err(ValuePathParseError::new("unterminated quoted key"));
        }
        if chars.get(*idx).copied() != Some(']') {
            return Err(ValuePathParseError::new("expected closing ']'"));
        }
        *idx += 1;
        return Ok(PathSegment::Key(key));
    }

    let start = *idx;
    while *idx < chars.len() && chars[*idx] != ']' {
        *idx += 1;
    }
    if *idx >= chars.len() {
        return Err(ValuePathParseError::new("unterminated '[' segment"));
    }
    let raw: String = chars[start..*idx].iter().collect();
    *idx += 1;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValuePathParseError::new("empty bracket segment"));
    }
    Ok(match trimmed.parse::<usize>() {
        Ok(index) => PathSegment::Index(index),
        Err(_) => PathSegment::Key(trimmed.to_string()),
    })
}

fn is_identifier(input: &str) -> bool {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
