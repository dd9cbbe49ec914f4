use std::borrow::Cow;

/// First and last code points of the stripped tashkeel block
/// (fathatan through sukun).
const DIACRITICS_START: char = '\u{064B}';
const DIACRITICS_END: char = '\u{0652}';

/// Whether `c` is one of the Arabic combining marks removed by [`normalize`]
pub fn is_arabic_diacritic(c: char) -> bool {
    (DIACRITICS_START..=DIACRITICS_END).contains(&c)
}

/// Canonical form of a letter that has presentation variants
fn canonical_letter(c: char) -> Option<char> {
    match c {
        // hamza above, hamza below, madda -> bare alef
        'أ' | 'إ' | 'آ' => Some('ا'),
        // taa marbuta -> haa
        'ة' => Some('ه'),
        // alef maqsura -> yaa
        'ى' => Some('ي'),
        _ => None,
    }
}

fn needs_rewrite(c: char) -> bool {
    is_arabic_diacritic(c) || canonical_letter(c).is_some()
}

/// Normalize Arabic text for comparison
///
/// Folds every alef variant to bare alef, taa marbuta to haa and alef
/// maqsura to yaa, then drops tashkeel. Text that needs no change
/// (including the empty string) is returned borrowed.
///
/// The transform is idempotent: `normalize(&normalize(s)) == normalize(s)`.
///
/// ```
/// use catalog_common::search::normalize;
///
/// assert_eq!(normalize("أمريكا"), normalize("امريكا"));
/// assert_eq!(normalize("مَدْرَسَة"), "مدرسه");
/// ```
pub fn normalize(text: &str) -> Cow<'_, str> {
    if !text.chars().any(needs_rewrite) {
        return Cow::Borrowed(text);
    }

    Cow::Owned(
        text.chars()
            .filter(|c| !is_arabic_diacritic(*c))
            .map(|c| canonical_letter(c).unwrap_or(c))
            .collect(),
    )
}

/// The form both sides of a search comparison are reduced to:
/// [`normalize`] followed by lowercasing.
///
/// Lowercasing is per code point, like the database's `lower`, so the
/// result matches `catalog_search_key` in SQL. Dotted capital I folds to a
/// plain `i` rather than `i` plus a combining dot.
pub fn search_key(text: &str) -> String {
    let normalized = normalize(text);
    let mut key = String::with_capacity(normalized.len());
    for c in normalized.chars() {
        match c {
            '\u{0130}' => key.push('i'),
            _ => key.extend(c.to_lowercase()),
        }
    }
    key
}
