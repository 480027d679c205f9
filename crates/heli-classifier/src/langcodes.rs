//! ISO 639 language code mapping
//!
//! The classifier speaks ISO 639-3. Callers may use either ISO 639-1 or
//! ISO 639-3 (and the ISO 639-2/B bibliographic variants) when restricting
//! the language set.

use isolang::Language;

/// ISO 639-2/B codes that differ from their 639-3 (terminological) form
const BIBLIOGRAPHIC: &[(&str, &str)] = &[
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("dut", "nld"),
    ("fre", "fra"),
    ("geo", "kat"),
    ("ger", "deu"),
    ("gre", "ell"),
    ("ice", "isl"),
    ("mac", "mkd"),
    ("mao", "mri"),
    ("may", "msa"),
    ("per", "fas"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("tib", "bod"),
    ("wel", "cym"),
];

/// Resolve an alpha-2 or alpha-3 code to its ISO 639-3 form.
///
/// Returns `None` for anything that is not a known language code.
pub fn to_alpha3(code: &str) -> Option<&'static str> {
    lookup(code).map(|lang| lang.to_639_3())
}

/// Resolve a code to its ISO 639-1 form, if the language has one.
pub fn to_alpha2(code: &str) -> Option<&'static str> {
    lookup(code).and_then(|lang| lang.to_639_1())
}

/// Whether `code` names a known language
pub fn is_valid(code: &str) -> bool {
    lookup(code).is_some()
}

fn lookup(code: &str) -> Option<Language> {
    let code = code.trim().to_ascii_lowercase();
    match code.len() {
        2 => Language::from_639_1(&code),
        3 => Language::from_639_3(&code).or_else(|| {
            BIBLIOGRAPHIC
                .iter()
                .find(|(b, _)| *b == code)
                .and_then(|(_, t)| Language::from_639_3(t))
        }),
        _ => None,
    }
}
