// src/core/phonetic.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row of the gojūon table a kana belongs to. Each key on the keyboard
/// stands for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Consonant {
    A,
    K,
    S,
    T,
    N,
    H,
    M,
    Y,
    R,
    W,
}

/// Column of the gojūon table a kana belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vowel {
    A,
    I,
    U,
    E,
    O,
}

impl Consonant {
    pub const ALL: [Consonant; 10] = [
        Consonant::A,
        Consonant::K,
        Consonant::S,
        Consonant::T,
        Consonant::N,
        Consonant::H,
        Consonant::M,
        Consonant::Y,
        Consonant::R,
        Consonant::W,
    ];

    /// The kana printed on the key for this row.
    pub fn glyph(self) -> char {
        match self {
            Consonant::A => 'あ',
            Consonant::K => 'か',
            Consonant::S => 'さ',
            Consonant::T => 'た',
            Consonant::N => 'な',
            Consonant::H => 'は',
            Consonant::M => 'ま',
            Consonant::Y => 'や',
            Consonant::R => 'ら',
            Consonant::W => 'わ',
        }
    }
}

impl fmt::Display for Consonant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

impl Vowel {
    pub fn glyph(self) -> char {
        match self {
            Vowel::A => 'あ',
            Vowel::I => 'い',
            Vowel::U => 'う',
            Vowel::E => 'え',
            Vowel::O => 'お',
        }
    }
}

impl fmt::Display for Vowel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// Row of a single hiragana. Voiced, semi-voiced and small forms share the
/// row of their base kana; `ん` and `ー` ride on the わ key.
pub fn consonant_of(c: char) -> Option<Consonant> {
    use Consonant::*;
    match c {
        'あ' | 'い' | 'う' | 'え' | 'お' | 'ぁ' | 'ぃ' | 'ぅ' | 'ぇ' | 'ぉ' | 'ゔ' => Some(A),
        'か' | 'き' | 'く' | 'け' | 'こ' | 'が' | 'ぎ' | 'ぐ' | 'げ' | 'ご' => Some(K),
        'さ' | 'し' | 'す' | 'せ' | 'そ' | 'ざ' | 'じ' | 'ず' | 'ぜ' | 'ぞ' => Some(S),
        'た' | 'ち' | 'つ' | 'て' | 'と' | 'だ' | 'ぢ' | 'づ' | 'で' | 'ど' | 'っ' => Some(T),
        'な' | 'に' | 'ぬ' | 'ね' | 'の' => Some(N),
        'は' | 'ひ' | 'ふ' | 'へ' | 'ほ' | 'ば' | 'び' | 'ぶ' | 'べ' | 'ぼ' | 'ぱ' | 'ぴ' | 'ぷ'
        | 'ぺ' | 'ぽ' => Some(H),
        'ま' | 'み' | 'む' | 'め' | 'も' => Some(M),
        'や' | 'ゆ' | 'よ' | 'ゃ' | 'ゅ' | 'ょ' => Some(Y),
        'ら' | 'り' | 'る' | 'れ' | 'ろ' => Some(R),
        'わ' | 'を' | 'ん' | 'ー' => Some(W),
        _ => None,
    }
}

/// Column of a single hiragana. Follows pronunciation: `ん` and `っ` sound
/// like an う-column kana, the long-vowel mark like え.
pub fn vowel_of(c: char) -> Option<Vowel> {
    use Vowel::*;
    match c {
        'あ' | 'か' | 'が' | 'さ' | 'ざ' | 'た' | 'だ' | 'な' | 'は' | 'ば' | 'ぱ' | 'ま' | 'や'
        | 'ゃ' | 'ら' | 'わ' | 'ぁ' => Some(A),
        'い' | 'き' | 'ぎ' | 'し' | 'じ' | 'ち' | 'ぢ' | 'に' | 'ひ' | 'び' | 'ぴ' | 'み' | 'り'
        | 'ぃ' | 'を' => Some(I),
        'う' | 'く' | 'ぐ' | 'す' | 'ず' | 'つ' | 'づ' | 'っ' | 'ぬ' | 'ふ' | 'ぶ' | 'ぷ' | 'む'
        | 'ゆ' | 'ゅ' | 'る' | 'ゔ' | 'ぅ' | 'ん' => Some(U),
        'え' | 'け' | 'げ' | 'せ' | 'ぜ' | 'て' | 'で' | 'ね' | 'へ' | 'べ' | 'ぺ' | 'め' | 'れ'
        | 'ぇ' | 'ー' => Some(E),
        'お' | 'こ' | 'ご' | 'そ' | 'ぞ' | 'と' | 'ど' | 'の' | 'ほ' | 'ぼ' | 'ぽ' | 'も' | 'よ'
        | 'ょ' | 'ろ' | 'ぉ' => Some(O),
        _ => None,
    }
}

/// Rows of every classifiable character in `text`, in order.
/// Characters outside the tables are dropped, not substituted.
pub fn consonant_sequence(text: &str) -> Vec<Consonant> {
    text.chars().filter_map(consonant_of).collect()
}

/// Columns of every classifiable character in `text`, in order.
pub fn vowel_sequence(text: &str) -> Vec<Vowel> {
    text.chars().filter_map(vowel_of).collect()
}
