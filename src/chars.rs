//! Code point normalization helpers.
//!
//! The match oracle compares dictionary characters against typed keys in
//! two forms: the raw code point and a base form with case and common
//! Latin diacritics folded away. Accented/base equivalence is free for the
//! downstream search, so the folding here is deliberately conservative:
//! only well-known Latin ranges are mapped, everything else passes through
//! unchanged.

/// Fold a code point to its lower-case, accent-stripped base form.
///
/// Unknown or non-character code points are returned unchanged; the caller
/// treats them as ordinary (unmatchable) codes rather than errors.
pub fn to_base_lower_code(code_point: i32) -> i32 {
    let Some(ch) = u32::try_from(code_point).ok().and_then(char::from_u32) else {
        return code_point;
    };
    let lower = ch.to_lowercase().next().unwrap_or(ch);
    let base = match lower {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' | 'ħ' => 'h',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' | 'ŧ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    };
    base as i32
}

/// Code points that never map to a key but are valid inside words.
/// Point-to-key queries for these return a zero length instead of the far
/// sentinel.
pub fn is_skippable_code_point(code_point: i32) -> bool {
    code_point == '\'' as i32 || code_point == '-' as i32
}
