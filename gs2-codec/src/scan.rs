//! Byte-level state machine for GS2 text.
//!
//! The scanner knows nothing about block or attribute names. It classifies
//! each byte given its current state and leaves the grammar to the decoder.

/// Token class produced for one input byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// The byte belongs to the current name or value.
    Continue,
    /// A `#` delimiter. Emitted for both halves of a `##` block header.
    Hash,
    /// The `=` between an attribute name and its value.
    BeginValue,
    /// `<`
    ArrayStart,
    /// A space inside an array.
    ArraySeparator,
    /// `>`
    ArrayEnd,
    /// Insignificant whitespace.
    SkipSpace,
    /// The byte is invalid here. Sticky until a new scanner is built.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    BeginScan,
    AfterHash,
    InBlockName,
    InValue,
    InArray,
    Error,
}

#[derive(Debug, Clone)]
pub struct Scanner {
    state: State,
    error: Option<String>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            state: State::BeginScan,
            error: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Why the scanner entered its error state, if it has.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Classify `b` and advance.
    pub fn step(&mut self, b: u8) -> Scan {
        match self.state {
            State::BeginScan => self.begin_scan(b),
            State::AfterHash => self.after_hash(b),
            State::InBlockName => self.block_name(b),
            State::InValue => self.value(b),
            State::InArray => self.array(b),
            State::Error => Scan::Error,
        }
    }

    fn begin_scan(&mut self, b: u8) -> Scan {
        if b.is_ascii_whitespace() {
            return Scan::SkipSpace;
        }
        if b == b'#' {
            self.state = State::AfterHash;
            return Scan::Hash;
        }
        self.fail(format!("got invalid character {:?} looking for start", b as char))
    }

    // Attribute names are accumulated in this state: anything other than a
    // second `#` or `=` is part of the name and leaves the state unchanged.
    fn after_hash(&mut self, b: u8) -> Scan {
        match b {
            b'#' => {
                self.state = State::InBlockName;
                Scan::Hash
            }
            b'=' => {
                self.state = State::InValue;
                Scan::BeginValue
            }
            _ => Scan::Continue,
        }
    }

    fn block_name(&mut self, b: u8) -> Scan {
        if b.is_ascii_whitespace() {
            return Scan::SkipSpace;
        }
        if b == b'#' {
            self.state = State::AfterHash;
            return Scan::Hash;
        }
        Scan::Continue
    }

    fn value(&mut self, b: u8) -> Scan {
        if b != b' ' && b.is_ascii_whitespace() {
            return Scan::SkipSpace;
        }
        match b {
            b'#' => {
                self.state = State::AfterHash;
                Scan::Hash
            }
            b'<' => {
                self.state = State::InArray;
                Scan::ArrayStart
            }
            _ => Scan::Continue,
        }
    }

    fn array(&mut self, b: u8) -> Scan {
        match b {
            b' ' => Scan::ArraySeparator,
            b'>' => {
                self.state = State::BeginScan;
                Scan::ArrayEnd
            }
            _ => Scan::Continue,
        }
    }

    fn fail(&mut self, reason: String) -> Scan {
        self.state = State::Error;
        self.error = Some(reason);
        Scan::Error
    }
}
