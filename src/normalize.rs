//! Arabic text normalization
//!
//! One pure transform applied identically to corpus text at index-build time
//! and to recognized speech at match time. Step order matters: spoken-form
//! substitutions must run before diacritic stripping, and the wasla-lam fold
//! must run after it so a vowel mark between the wasla-alef and the lam
//! cannot defeat the fold.

/// Spoken readings of the mysterious-letter chapter openers, folded to their
/// short written forms. Applied as literal substring replacements, in order.
const SPOKEN_OPENERS: &[(&str, &str)] = &[
    ("ياسين", "يس"),
    ("طاها", "طه"),
    ("حاميم", "حم"),
    ("صاد", "ص"),
    ("قاف", "ق"),
    ("نون", "ن"),
    ("الف لام ميم", "الم"),
    ("الف لام راء", "الر"),
    ("كاف ها يا عين صاد", "كهيعص"),
];

/// Precomposed Qur'anic-orthography spellings of the same openers
/// (superscript alef U+0670, madda U+0653) collapsed to plain letters.
const PRECOMPOSED_OPENERS: &[(&str, &str)] = &[
    ("\u{64A}\u{670}\u{633}\u{653}", "يس"), // يٰسٓ
    ("\u{637}\u{670}\u{647}\u{670}", "طه"), // طٰهٰ
    ("\u{62D}\u{670}\u{645}\u{653}", "حم"), // حٰمٓ
];

/// Normalize Arabic text into the canonical comparable form.
///
/// Never fails, has no state, and is idempotent: applying it to its own
/// output returns the same string. Unknown codepoints pass through.
pub fn normalize(text: &str) -> String {
    // 1. BOM and bidi control marks
    let mut s: String = text
        .chars()
        .filter(|c| !matches!(c, '\u{FEFF}' | '\u{200E}' | '\u{200F}'))
        .collect();

    // 2. Spoken-form openers, before any diacritic stripping
    for (spoken, written) in SPOKEN_OPENERS {
        if s.contains(spoken) {
            s = s.replace(spoken, written);
        }
    }

    // 3. Precomposed opener spellings
    for (composed, plain) in PRECOMPOSED_OPENERS {
        if s.contains(composed) {
            s = s.replace(composed, plain);
        }
    }

    // 4-8. Single pass: strip diacritics, fold letter variants
    let s: String = s
        .chars()
        .filter_map(|c| match c {
            // Tashkeel, superscript alef, tatweel, Qur'anic annotation marks
            '\u{064B}'..='\u{065F}' | '\u{0670}' | '\u{0640}' => None,
            '\u{06D6}'..='\u{06ED}' => None,
            '\u{08F0}'..='\u{08FF}' => None,
            // Hamza-bearing alef variants
            'آ' | 'أ' | 'إ' => Some('ا'),
            // Yeh variants
            'ى' | 'ئ' => Some('ي'),
            // Teh marbuta
            'ة' => Some('ه'),
            // Hamza on waw
            'ؤ' => Some('و'),
            _ => Some(c),
        })
        .collect();

    // Wasla-alef + lam to plain alef-lam, keeping the definite article.
    // Runs after stripping so marks between the pair are already gone;
    // a lone wasla-alef outside this pair is left as written.
    let s = s.replace("\u{671}\u{644}", "ال");

    // 9. Vocative particle: spoken and stripped-orthography spellings of
    // "O you who..." converge on one canonical form
    let s = s.replace("ياايها", "يا ايها");
    let s = s.replace("يايها", "يا ايها");

    // 10-11. Whitespace collapse, case fold
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BISMILLAH_VOWELED: &str = "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ";
    const BISMILLAH_PLAIN: &str = "بسم الله الرحمن الرحيم";

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n"), "");
    }

    #[test]
    fn strips_bom_and_bidi_marks() {
        assert_eq!(normalize("\u{FEFF}بسم\u{200F} الله\u{200E}"), "بسم الله");
    }

    #[test]
    fn diacritic_invariance() {
        assert_eq!(normalize(BISMILLAH_VOWELED), normalize(BISMILLAH_PLAIN));
        assert_eq!(normalize(BISMILLAH_VOWELED), BISMILLAH_PLAIN);
    }

    #[test]
    fn spoken_openers_match_written_forms() {
        assert_eq!(normalize("ياسين"), normalize("يس"));
        assert_eq!(normalize("طاها"), normalize("طه"));
        assert_eq!(normalize("الف لام ميم"), normalize("الم"));
    }

    #[test]
    fn precomposed_openers_collapse() {
        // Uthmani-script Ya-Sin with superscript alef and madda
        assert_eq!(normalize("\u{64A}\u{670}\u{633}\u{653}"), "يس");
        assert_eq!(normalize("\u{62D}\u{670}\u{645}\u{653}"), "حم");
    }

    #[test]
    fn wasla_lam_keeps_definite_article() {
        assert_eq!(normalize("ٱلْحَمْدُ"), "الحمد");
        // lone wasla-alef outside the article is left alone
        assert_eq!(normalize("\u{671}"), "\u{671}");
    }

    #[test]
    fn marked_wasla_lam_still_folds() {
        // A vowel mark or tatweel between the wasla-alef and the lam
        assert_eq!(normalize("\u{671}\u{64E}\u{644}حمد"), "الحمد");
        assert_eq!(normalize("\u{671}\u{640}\u{644}حمد"), "الحمد");
        let once = normalize("\u{671}\u{64E}\u{644}حمد");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn letter_variant_folds() {
        assert_eq!(normalize("أإآ"), "\u{627}\u{627}\u{627}");
        assert_eq!(normalize("موسى"), "موسي");
        assert_eq!(normalize("رحمة"), "رحمه");
        assert_eq!(normalize("مؤمن"), "مومن");
    }

    #[test]
    fn vocative_spellings_converge() {
        let canonical = "يا ايها";
        assert_eq!(normalize("يا أيها"), canonical);
        assert_eq!(normalize("يا ايها"), canonical);
        // Qur'anic orthography with its diacritic marks
        assert_eq!(normalize("يَٰٓأَيُّهَا"), canonical);
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(normalize("  بسم   الله \n الرحمن  "), "بسم الله الرحمن");
    }

    #[test]
    fn idempotent_on_sampled_strings() {
        let samples = [
            "",
            BISMILLAH_VOWELED,
            BISMILLAH_PLAIN,
            "قُلْ يَٰٓأَيُّهَا ٱلْكَٰفِرُونَ",
            "ياسين والقرآن الحكيم",
            "يا أيها الذين آمنوا",
            "plain latin TEXT",
            "مرحبا 123 hello",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn unknown_codepoints_pass_through() {
        assert_eq!(normalize("日本語"), "日本語");
    }

    #[test]
    fn case_folds_latin() {
        assert_eq!(normalize("ABC"), "abc");
    }
}
