//! Immutable character-fold tables and character classes.
//!
//! All tables are constructed once and never mutated; the normalizer treats
//! them as injected configuration data. Many-to-one maps fold the different
//! encodings of a visually or phonetically identical letter down to one
//! canonical form.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Zero-width, invisible, and variation-selector characters stripped first.
pub fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{200B}'            // zero width space
            | '\u{200C}'      // zero width non-joiner
            | '\u{200D}'      // zero width joiner
            | '\u{2060}'      // word joiner
            | '\u{FEFF}'      // zero width no-break space
            | '\u{00AD}'      // soft hyphen
            | '\u{180E}'      // mongolian vowel separator
            | '\u{FE00}'..='\u{FE0F}' // variation selectors
    ) || (c.is_control() && c != '\t' && c != '\n' && c != '\r')
}

/// Bidirectional formatting marks and elongation characters.
pub fn is_bidi_or_elongation(c: char) -> bool {
    matches!(
        c,
        '\u{200E}'            // left-to-right mark
            | '\u{200F}'      // right-to-left mark
            | '\u{202A}'..='\u{202E}' // embedding/override controls
            | '\u{2066}'..='\u{2069}' // isolate controls
            | '\u{061C}'      // arabic letter mark
            | '\u{0640}'      // arabic tatweel
    )
}

/// Combining marks removed when stripping diacritics.
pub fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{0483}'..='\u{0489}'
            | '\u{0591}'..='\u{05C7}'
            | '\u{0610}'..='\u{061A}'
            | '\u{064B}'..='\u{065F}'
            | '\u{0670}'
            | '\u{06D6}'..='\u{06ED}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
    )
}

/// Separator characters used as artificial word-spacing ("f.u.c.k").
pub fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '.' | '-' | '_' | ',' | ':' | ';' | '·' | '•' | '/' | '\\')
}

/// Decorative symbols collapsed to nothing by the leet stage.
pub fn is_decorative(c: char) -> bool {
    matches!(c, '*' | '~' | '^' | '`' | '´' | '¨' | '°' | '"' | '\'' | '’' | '‘')
}

/// Whether `c` counts as a word character for boundary filtering.
///
/// Covers ASCII alphanumerics plus the non-Latin alphabetic blocks the engine
/// supports patterns in.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '\u{00C0}'..='\u{024F}' // latin-1 supplement + extended
                | '\u{0370}'..='\u{03FF}' // greek
                | '\u{0400}'..='\u{04FF}' // cyrillic
                | '\u{0590}'..='\u{05FF}' // hebrew
                | '\u{0600}'..='\u{06FF}' // arabic
                | '\u{0900}'..='\u{097F}' // devanagari
        )
}

/// Whether `c` is a letter outside the Latin script.
pub fn is_non_latin_letter(c: char) -> bool {
    c.is_alphabetic() && !c.is_ascii_alphabetic() && !matches!(c, '\u{00C0}'..='\u{024F}')
}

/// Script-specific letter variants folded to one canonical letterform.
///
/// Handles letters with several encodings that render identically, e.g. the
/// hamza-carrying forms of the Arabic alef.
pub static SCRIPT_VARIANTS: Lazy<HashMap<char, char>> = Lazy::new(|| {
    let pairs: &[(char, char)] = &[
        // Arabic alef forms
        ('أ', 'ا'),
        ('إ', 'ا'),
        ('آ', 'ا'),
        ('ٱ', 'ا'),
        // Arabic yeh / alef maksura and Persian yeh
        ('ى', 'ي'),
        ('ی', 'ي'),
        // Teh marbuta renders like heh
        ('ة', 'ه'),
        ('ۀ', 'ه'),
        // Persian kaf
        ('ک', 'ك'),
        ('گ', 'ك'),
        // Cyrillic io is the base e with a diaeresis
        ('ё', 'е'),
        ('Ё', 'Е'),
    ];
    pairs.iter().copied().collect()
});

/// Precomposed accented Latin letters folded to their base letter.
pub static DIACRITIC_FOLDS: Lazy<HashMap<char, char>> = Lazy::new(|| {
    let pairs: &[(&str, char)] = &[
        ("àáâãäåāăą", 'a'),
        ("ÀÁÂÃÄÅĀĂĄ", 'A'),
        ("èéêëēėęě", 'e'),
        ("ÈÉÊËĒĖĘĚ", 'E'),
        ("ìíîïīįı", 'i'),
        ("ÌÍÎÏĪĮİ", 'I'),
        ("òóôõöōőø", 'o'),
        ("ÒÓÔÕÖŌŐØ", 'O'),
        ("ùúûüūůű", 'u'),
        ("ÙÚÛÜŪŮŰ", 'U'),
        ("ýÿ", 'y'),
        ("ÝŸ", 'Y'),
        ("ñńň", 'n'),
        ("ÑŃŇ", 'N'),
        ("çćč", 'c'),
        ("ÇĆČ", 'C'),
        ("śšş", 's'),
        ("ŚŠŞ", 'S'),
        ("žźż", 'z'),
        ("ŽŹŻ", 'Z'),
        ("ł", 'l'),
        ("Ł", 'L'),
        ("đ", 'd'),
        ("Đ", 'D'),
        ("ğ", 'g'),
        ("Ğ", 'G'),
        ("ţť", 't'),
        ("ŢŤ", 'T'),
        ("ŕř", 'r'),
        ("ŔŘ", 'R'),
    ];
    let mut map = HashMap::new();
    for (variants, base) in pairs {
        for variant in variants.chars() {
            map.insert(variant, *base);
        }
    }
    map
});

/// Cyrillic and Greek letters that render identically to a Latin letter.
pub static CONFUSABLES: Lazy<HashMap<char, char>> = Lazy::new(|| {
    let pairs: &[(char, char)] = &[
        // Cyrillic lowercase homoglyphs
        ('а', 'a'),
        ('е', 'e'),
        ('о', 'o'),
        ('р', 'p'),
        ('с', 'c'),
        ('у', 'y'),
        ('х', 'x'),
        ('ѕ', 's'),
        ('і', 'i'),
        ('ј', 'j'),
        ('һ', 'h'),
        // Cyrillic uppercase homoglyphs
        ('А', 'A'),
        ('В', 'B'),
        ('Е', 'E'),
        ('К', 'K'),
        ('М', 'M'),
        ('Н', 'H'),
        ('О', 'O'),
        ('Р', 'P'),
        ('С', 'C'),
        ('Т', 'T'),
        ('У', 'Y'),
        ('Х', 'X'),
        // Greek homoglyphs
        ('ο', 'o'),
        ('α', 'a'),
        ('ι', 'i'),
        ('κ', 'k'),
        ('ν', 'v'),
        ('τ', 't'),
        ('ρ', 'p'),
        ('Α', 'A'),
        ('Β', 'B'),
        ('Ε', 'E'),
        ('Ζ', 'Z'),
        ('Η', 'H'),
        ('Ι', 'I'),
        ('Κ', 'K'),
        ('Μ', 'M'),
        ('Ν', 'N'),
        ('Ο', 'O'),
        ('Ρ', 'P'),
        ('Τ', 'T'),
        ('Υ', 'Y'),
        ('Χ', 'X'),
        // German sharp s
        ('ß', 's'),
    ];
    pairs.iter().copied().collect()
});

/// Fold a confusable glyph to its plain-ASCII equivalent.
///
/// Covers fullwidth forms, enclosed alphanumerics, regional indicators,
/// squared-letter emoji, and the [`CONFUSABLES`] homoglyph table.
pub fn fold_confusable(c: char) -> Option<char> {
    let code = c as u32;
    let folded = match code {
        // Fullwidth ASCII block maps directly onto printable ASCII
        0xFF01..=0xFF5E => char::from_u32(code - 0xFEE0),
        // Parenthesized latin small letters
        0x249C..=0x24B5 => char::from_u32(code - 0x249C + 'a' as u32),
        // Circled latin capital / small letters
        0x24B6..=0x24CF => char::from_u32(code - 0x24B6 + 'A' as u32),
        0x24D0..=0x24E9 => char::from_u32(code - 0x24D0 + 'a' as u32),
        // Regional indicator symbols (flag-letter emoji)
        0x1F1E6..=0x1F1FF => char::from_u32(code - 0x1F1E6 + 'a' as u32),
        // Squared latin capital letters
        0x1F130..=0x1F149 => char::from_u32(code - 0x1F130 + 'A' as u32),
        // Negative squared latin capital letters (boxed-letter emoji)
        0x1F170..=0x1F189 => char::from_u32(code - 0x1F170 + 'A' as u32),
        _ => None,
    };
    folded.or_else(|| CONFUSABLES.get(&c).copied())
}

/// Closest Latin phonetic equivalents for non-Latin letters.
///
/// Consulted only for mixed-script input; pure non-Latin text is left alone so
/// unrelated words are not folded into false matches.
pub static PHONETIC_FOLDS: Lazy<HashMap<char, char>> = Lazy::new(|| {
    let pairs: &[(char, char)] = &[
        // Cyrillic
        ('б', 'b'),
        ('в', 'v'),
        ('г', 'g'),
        ('д', 'd'),
        ('ж', 'z'),
        ('з', 'z'),
        ('и', 'i'),
        ('й', 'i'),
        ('к', 'k'),
        ('л', 'l'),
        ('м', 'm'),
        ('н', 'n'),
        ('п', 'p'),
        ('т', 't'),
        ('ф', 'f'),
        ('ц', 'c'),
        ('ч', 'c'),
        ('ш', 's'),
        ('щ', 's'),
        ('ы', 'y'),
        ('э', 'e'),
        ('ю', 'u'),
        ('я', 'a'),
        // Greek
        ('β', 'b'),
        ('γ', 'g'),
        ('δ', 'd'),
        ('ε', 'e'),
        ('ζ', 'z'),
        ('η', 'i'),
        ('θ', 't'),
        ('λ', 'l'),
        ('μ', 'm'),
        ('ξ', 'x'),
        ('π', 'p'),
        ('σ', 's'),
        ('ς', 's'),
        ('υ', 'u'),
        ('φ', 'f'),
        ('χ', 'x'),
        ('ψ', 'p'),
        ('ω', 'o'),
        // Arabic
        ('ا', 'a'),
        ('ب', 'b'),
        ('ت', 't'),
        ('ث', 't'),
        ('ج', 'j'),
        ('د', 'd'),
        ('ر', 'r'),
        ('ز', 'z'),
        ('س', 's'),
        ('ش', 's'),
        ('ف', 'f'),
        ('ق', 'q'),
        ('ك', 'k'),
        ('ل', 'l'),
        ('م', 'm'),
        ('ن', 'n'),
        ('ه', 'h'),
        ('و', 'w'),
        ('ي', 'y'),
    ];
    pairs.iter().copied().collect()
});

/// Leet and decorative symbol substitutions.
pub static LEET_FOLDS: Lazy<HashMap<char, char>> = Lazy::new(|| {
    let pairs: &[(char, char)] = &[
        ('0', 'o'),
        ('1', 'i'),
        ('3', 'e'),
        ('4', 'a'),
        ('5', 's'),
        ('6', 'g'),
        ('7', 't'),
        ('8', 'b'),
        ('9', 'g'),
        ('@', 'a'),
        ('$', 's'),
        ('!', 'i'),
        ('+', 't'),
        ('|', 'l'),
        ('(', 'c'),
        ('<', 'c'),
        ('€', 'e'),
        ('£', 'l'),
        ('¢', 'c'),
        ('¥', 'y'),
        ('§', 's'),
    ];
    pairs.iter().copied().collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invisible_classification() {
        assert!(is_invisible('\u{200B}'));
        assert!(is_invisible('\u{FEFF}'));
        assert!(is_invisible('\u{0007}'));
        assert!(!is_invisible('\n'));
        assert!(!is_invisible('a'));
    }

    #[test]
    fn test_bidi_and_elongation() {
        assert!(is_bidi_or_elongation('\u{202E}'));
        assert!(is_bidi_or_elongation('\u{0640}'));
        assert!(!is_bidi_or_elongation('ا'));
    }

    #[test]
    fn test_fullwidth_folding() {
        assert_eq!(fold_confusable('Ｆ'), Some('F'));
        assert_eq!(fold_confusable('ｕ'), Some('u'));
        assert_eq!(fold_confusable('５'), Some('5'));
    }

    #[test]
    fn test_enclosed_folding() {
        assert_eq!(fold_confusable('Ⓐ'), Some('A'));
        assert_eq!(fold_confusable('ⓩ'), Some('z'));
        assert_eq!(fold_confusable('🇫'), Some('f'));
        assert_eq!(fold_confusable('🅰'), Some('A'));
    }

    #[test]
    fn test_homoglyph_folding() {
        assert_eq!(fold_confusable('а'), Some('a')); // cyrillic
        assert_eq!(fold_confusable('ο'), Some('o')); // greek
        assert_eq!(fold_confusable('q'), None);
    }

    #[test]
    fn test_script_variant_folding() {
        assert_eq!(SCRIPT_VARIANTS.get(&'أ'), Some(&'ا'));
        assert_eq!(SCRIPT_VARIANTS.get(&'ё'), Some(&'е'));
    }

    #[test]
    fn test_phonetic_folding() {
        assert_eq!(PHONETIC_FOLDS.get(&'ф'), Some(&'f'));
        assert_eq!(PHONETIC_FOLDS.get(&'θ'), Some(&'t'));
        assert_eq!(PHONETIC_FOLDS.get(&'س'), Some(&'s'));
    }

    #[test]
    fn test_leet_folding() {
        assert_eq!(LEET_FOLDS.get(&'@'), Some(&'a'));
        assert_eq!(LEET_FOLDS.get(&'3'), Some(&'e'));
        assert!(!LEET_FOLDS.contains_key(&'a'));
    }

    #[test]
    fn test_word_char_ranges() {
        assert!(is_word_char('a'));
        assert!(is_word_char('7'));
        assert!(is_word_char('ж')); // cyrillic
        assert!(is_word_char('ش')); // arabic
        assert!(!is_word_char(' '));
        assert!(!is_word_char('.'));
    }

    #[test]
    fn test_non_latin_letter() {
        assert!(is_non_latin_letter('ж'));
        assert!(!is_non_latin_letter('a'));
        assert!(!is_non_latin_letter('é'));
        assert!(!is_non_latin_letter('!'));
    }
}
