//! Token kinds and the predecessor table that drives the idle-mode automaton.
//!
//! Each kind lists the kinds that may immediately precede it. Rules that
//! depend on nesting (closers matching their opener, keys only inside
//! objects) are checked against the assembly stack by the parser.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TokenKind {
    Begin,
    End,
    ArrayOpen,
    ArrayClose,
    ObjectOpen,
    ObjectClose,
    NameSeparator,
    ValueSeparator,
    String,
    Number,
    True,
    False,
    Null,
}

const KIND_COUNT: usize = TokenKind::Null as usize + 1;

impl TokenKind {
    /// Classifies the first byte of a token. Whitespace and bytes that cannot
    /// start a token return `None`.
    #[must_use]
    pub const fn from_lead_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            b'[' => Self::ArrayOpen,
            b']' => Self::ArrayClose,
            b'{' => Self::ObjectOpen,
            b'}' => Self::ObjectClose,
            b':' => Self::NameSeparator,
            b',' => Self::ValueSeparator,
            b'"' => Self::String,
            b'-' | b'0'..=b'9' => Self::Number,
            b't' => Self::True,
            b'f' => Self::False,
            b'n' => Self::Null,
            _ => return None,
        })
    }

    /// Kinds that begin a value.
    #[must_use]
    pub const fn starts_value(self) -> bool {
        matches!(
            self,
            Self::ArrayOpen
                | Self::ObjectOpen
                | Self::String
                | Self::Number
                | Self::True
                | Self::False
                | Self::Null
        )
    }

    #[must_use]
    pub const fn predecessors(self) -> TokenSet {
        PREDECESSORS[self as usize]
    }

    /// Whether `prev` may immediately precede `self`.
    #[must_use]
    pub const fn may_follow(self, prev: TokenKind) -> bool {
        self.predecessors().contains(prev)
    }
}

pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// A set of [`TokenKind`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenSet(u16);

impl TokenSet {
    pub const EMPTY: Self = Self(0);

    #[must_use]
    pub const fn of(kinds: &[TokenKind]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= 1 << kinds[i] as u16;
            i += 1;
        }
        Self(bits)
    }

    #[must_use]
    pub const fn contains(self, kind: TokenKind) -> bool {
        self.0 & (1 << kind as u16) != 0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

use TokenKind::{
    ArrayClose, ArrayOpen, Begin, End, False, NameSeparator, Null, Number, ObjectClose, ObjectOpen,
    String, True, ValueSeparator,
};

/// Positions where a value may start.
const VALUE_SLOT: TokenSet = TokenSet::of(&[Begin, ArrayOpen, NameSeparator, ValueSeparator]);

/// Kinds that complete a value.
const VALUE_END: TokenSet =
    TokenSet::of(&[ArrayClose, ObjectClose, String, Number, True, False, Null]);

const PREDECESSORS: [TokenSet; KIND_COUNT] = {
    let mut table = [TokenSet::EMPTY; KIND_COUNT];
    table[End as usize] = VALUE_END;
    table[ArrayOpen as usize] = VALUE_SLOT;
    table[ArrayClose as usize] = VALUE_END.union(TokenSet::of(&[ArrayOpen]));
    table[ObjectOpen as usize] = VALUE_SLOT;
    table[ObjectClose as usize] = VALUE_END.union(TokenSet::of(&[ObjectOpen]));
    table[NameSeparator as usize] = TokenSet::of(&[String]);
    table[ValueSeparator as usize] = VALUE_END;
    // Strings also open a member as its key.
    table[String as usize] = VALUE_SLOT.union(TokenSet::of(&[ObjectOpen]));
    table[Number as usize] = VALUE_SLOT;
    table[True as usize] = VALUE_SLOT;
    table[False as usize] = VALUE_SLOT;
    table[Null as usize] = VALUE_SLOT;
    table
};
