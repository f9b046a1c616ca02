//! LaTeX to plain text conversion.
//!
//! BibTeX fields carry TeX markup: accents (`{\"o}`), protected capitals
//! (`{B}ayes`), formatting commands (`\emph{...}`), math and TeX ligatures.
//! [`latex_to_text`] turns such a field into readable Unicode.

use itertools::Itertools;

/// Accent commands with the letters they compose with, and the composed forms
/// at the same positions.
const ACCENTS: &[(char, &str, &str)] = &[
    ('\'', "aeiouyAEIOUYcnszCNSZ", "áéíóúýÁÉÍÓÚÝćńśźĆŃŚŹ"),
    ('`', "aeiouAEIOU", "àèìòùÀÈÌÒÙ"),
    ('^', "aeiouAEIOU", "âêîôûÂÊÎÔÛ"),
    ('"', "aeiouyAEIOUY", "äëïöüÿÄËÏÖÜŸ"),
    ('~', "anoANO", "ãñõÃÑÕ"),
    ('=', "aeiouAEIOU", "āēīōūĀĒĪŌŪ"),
    ('.', "zeZEI", "żėŻĖİ"),
    ('c', "csCS", "çşÇŞ"),
    ('v', "cszrneCSZRNE", "čšžřňěČŠŽŘŇĚ"),
    ('u', "agAG", "ăğĂĞ"),
    ('H', "ouOU", "őűŐŰ"),
    ('k', "aeAE", "ąęĄĘ"),
    ('r', "auAU", "åůÅŮ"),
];

/// Combining marks used when no precomposed character exists.
const COMBINING: &[(char, char)] = &[
    ('\'', '\u{301}'),
    ('`', '\u{300}'),
    ('^', '\u{302}'),
    ('"', '\u{308}'),
    ('~', '\u{303}'),
    ('=', '\u{304}'),
    ('.', '\u{307}'),
    ('c', '\u{327}'),
    ('v', '\u{30C}'),
    ('u', '\u{306}'),
    ('H', '\u{30B}'),
    ('k', '\u{328}'),
    ('r', '\u{30A}'),
    ('d', '\u{323}'),
    ('b', '\u{331}'),
    ('t', '\u{361}'),
];

/// Control words standing for a single letter; TeX swallows the space after them.
const LETTERS: &[(&str, &str)] = &[
    ("ss", "ß"),
    ("ae", "æ"),
    ("AE", "Æ"),
    ("oe", "œ"),
    ("OE", "Œ"),
    ("aa", "å"),
    ("AA", "Å"),
    ("o", "ø"),
    ("O", "Ø"),
    ("l", "ł"),
    ("L", "Ł"),
    ("i", "ı"),
    ("j", "ȷ"),
];

const SYMBOLS: &[(&str, &str)] = &[
    ("ldots", "…"),
    ("dots", "…"),
    ("textellipsis", "…"),
    ("textendash", "–"),
    ("textemdash", "—"),
    ("textquoteleft", "\u{2018}"),
    ("textquoteright", "\u{2019}"),
    ("textquotedblleft", "\u{201C}"),
    ("textquotedblright", "\u{201D}"),
    ("textasciitilde", "~"),
    ("textbackslash", "\\"),
    ("textbar", "|"),
    ("copyright", "©"),
    ("texttrademark", "™"),
    ("textregistered", "®"),
    ("pounds", "£"),
    ("euro", "€"),
    ("S", "§"),
    ("P", "¶"),
    ("dag", "†"),
    ("ddag", "‡"),
    ("textbullet", "•"),
    ("textdegree", "°"),
    ("TeX", "TeX"),
    ("LaTeX", "LaTeX"),
    ("BibTeX", "BibTeX"),
    ("quad", " "),
    ("qquad", " "),
    // Greek
    ("alpha", "α"),
    ("beta", "β"),
    ("gamma", "γ"),
    ("delta", "δ"),
    ("epsilon", "ε"),
    ("varepsilon", "ε"),
    ("zeta", "ζ"),
    ("eta", "η"),
    ("theta", "θ"),
    ("iota", "ι"),
    ("kappa", "κ"),
    ("lambda", "λ"),
    ("mu", "μ"),
    ("nu", "ν"),
    ("xi", "ξ"),
    ("pi", "π"),
    ("rho", "ρ"),
    ("sigma", "σ"),
    ("tau", "τ"),
    ("upsilon", "υ"),
    ("phi", "φ"),
    ("varphi", "φ"),
    ("chi", "χ"),
    ("psi", "ψ"),
    ("omega", "ω"),
    ("Gamma", "Γ"),
    ("Delta", "Δ"),
    ("Theta", "Θ"),
    ("Lambda", "Λ"),
    ("Xi", "Ξ"),
    ("Pi", "Π"),
    ("Sigma", "Σ"),
    ("Phi", "Φ"),
    ("Psi", "Ψ"),
    ("Omega", "Ω"),
    // Math
    ("times", "×"),
    ("pm", "±"),
    ("mp", "∓"),
    ("cdot", "·"),
    ("leq", "≤"),
    ("le", "≤"),
    ("geq", "≥"),
    ("ge", "≥"),
    ("neq", "≠"),
    ("ne", "≠"),
    ("approx", "≈"),
    ("sim", "∼"),
    ("equiv", "≡"),
    ("infty", "∞"),
    ("partial", "∂"),
    ("nabla", "∇"),
    ("sum", "∑"),
    ("prod", "∏"),
    ("int", "∫"),
    ("sqrt", "√"),
    ("in", "∈"),
    ("subset", "⊂"),
    ("cup", "∪"),
    ("cap", "∩"),
    ("forall", "∀"),
    ("exists", "∃"),
    ("ell", "ℓ"),
    ("to", "→"),
    ("rightarrow", "→"),
    ("leftarrow", "←"),
    ("Rightarrow", "⇒"),
    ("leftrightarrow", "↔"),
    ("log", "log"),
    ("exp", "exp"),
    ("sin", "sin"),
    ("cos", "cos"),
    ("min", "min"),
    ("max", "max"),
];

/// Commands whose first argument is not shown, e.g. the URL of `\href{url}{text}`.
const HIDDEN_FIRST_ARGUMENT: &[&str] = &["href"];

/// Converts LaTeX-formatted text to plain Unicode.
///
/// Empty or whitespace-only input yields an empty string. Runs of whitespace
/// collapse to one space and the result is trimmed.
///
/// # Examples
///
/// ```
/// use sitebib::latex_to_text;
///
/// assert_eq!(latex_to_text(r#"Learning {B}ayesian Nets with \emph{Sch\"{o}n}"#),
///            "Learning Bayesian Nets with Schön");
/// assert_eq!(latex_to_text(r"$\alpha$-stable laws"), "α-stable laws");
/// ```
pub fn latex_to_text(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    let chars: Vec<char> = input.chars().collect();
    let mut text = String::with_capacity(input.len());
    convert(&chars, &mut text);
    text.split_ascii_whitespace().join(" ").trim().to_string()
}

fn convert(chars: &[char], out: &mut String) {
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i = convert_command(chars, i + 1, out),
            '{' | '}' | '$' => i += 1,
            '%' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '~' => {
                out.push('\u{a0}');
                i += 1;
            }
            '-' => {
                let run = chars[i..].iter().take_while(|&&c| c == '-').count();
                match run {
                    1 => out.push('-'),
                    2 => out.push('–'),
                    _ => out.push('—'),
                }
                i += run.min(3);
            }
            '`' if chars.get(i + 1) == Some(&'`') => {
                out.push('\u{201C}');
                i += 2;
            }
            '`' => {
                out.push('\u{2018}');
                i += 1;
            }
            '\'' if chars.get(i + 1) == Some(&'\'') => {
                out.push('\u{201D}');
                i += 2;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
}

/// Converts the command starting after a backslash at `start`; returns the
/// index just past everything it consumed.
fn convert_command(chars: &[char], start: usize, out: &mut String) -> usize {
    let Some(&first) = chars.get(start) else {
        return start;
    };

    if !first.is_ascii_alphabetic() {
        let next = start + 1;
        match first {
            '\\' => out.push(' '),
            c if is_accent(c) => return convert_accent(chars, next, c, out),
            ' ' | ',' | ';' | ':' | '!' => out.push(' '),
            // Discretionary hyphen and spacing corrections print nothing.
            '-' | '/' | '@' => {}
            c => out.push(c),
        }
        return next;
    }

    let end = start
        + chars[start..]
            .iter()
            .take_while(|c| c.is_ascii_alphabetic())
            .count();
    let name: String = chars[start..end].iter().collect();

    if let Some(accent) = single_char(&name).filter(|c| is_accent(*c)) {
        let arg = skip_spaces(chars, end);
        return convert_accent(chars, arg, accent, out);
    }

    if let Some((_, letter)) = LETTERS.iter().find(|(n, _)| *n == name) {
        out.push_str(letter);
        return skip_spaces(chars, end);
    }

    if let Some((_, symbol)) = SYMBOLS.iter().find(|(n, _)| *n == name) {
        out.push_str(symbol);
        return end;
    }

    if HIDDEN_FIRST_ARGUMENT.contains(&name.as_str()) {
        let arg = skip_spaces(chars, end);
        if chars.get(arg) == Some(&'{') {
            return group_end(chars, arg);
        }
    }

    // Unknown commands vanish; their arguments stay as text.
    end
}

/// Applies an accent to the argument starting at `start`.
fn convert_accent(chars: &[char], start: usize, accent: char, out: &mut String) -> usize {
    let (argument, next) = match chars.get(start) {
        Some('{') => {
            let end = group_end(chars, start);
            let inner_end = end.saturating_sub(1).max(start + 1);
            let mut inner = String::new();
            convert(&chars[start + 1..inner_end], &mut inner);
            (inner, end)
        }
        Some('\\') => {
            let mut inner = String::new();
            let end = convert_command(chars, start + 1, &mut inner);
            (inner, end)
        }
        Some(&c) => (c.to_string(), start + 1),
        None => (String::new(), start),
    };

    let mut letters = argument.chars();
    if let Some(base) = letters.next() {
        out.push_str(&compose(base, accent));
        out.extend(letters);
    }
    next
}

fn compose(base: char, accent: char) -> String {
    let base = match base {
        'ı' => 'i',
        'ȷ' => 'j',
        c => c,
    };
    let precomposed = ACCENTS
        .iter()
        .find(|(a, _, _)| *a == accent)
        .and_then(|(_, bases, composed)| {
            let position = bases.chars().position(|b| b == base)?;
            composed.chars().nth(position)
        });
    match precomposed {
        Some(c) => c.to_string(),
        None => match COMBINING.iter().find(|(a, _)| *a == accent) {
            Some((_, mark)) => format!("{base}{mark}"),
            None => base.to_string(),
        },
    }
}

fn is_accent(c: char) -> bool {
    COMBINING.iter().any(|(a, _)| *a == c)
}

fn single_char(name: &str) -> Option<char> {
    let mut chars = name.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

fn skip_spaces(chars: &[char], start: usize) -> usize {
    start
        + chars[start.min(chars.len())..]
            .iter()
            .take_while(|c| **c == ' ' || **c == '\t')
            .count()
}

/// Index just past the group opened by the `{` at `start`, or the end of input.
fn group_end(chars: &[char], start: usize) -> usize {
    let mut depth = 0usize;
    let mut i = start;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    chars.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{\"o}"#, "ö")]
    #[case(r#"\"o"#, "ö")]
    #[case(r#"\"{O}"#, "Ö")]
    #[case(r"\'e", "é")]
    #[case(r"\'{\i}", "í")]
    #[case(r"\'\i", "í")]
    #[case(r"\`a", "à")]
    #[case(r"\^{o}", "ô")]
    #[case(r"\~n", "ñ")]
    #[case(r"\c{c}", "ç")]
    #[case(r"\c c", "ç")]
    #[case(r"\v{s}", "š")]
    #[case(r"\H{o}", "ő")]
    #[case(r"\=x", "x\u{304}")]
    #[case(r"Erd\H{o}s", "Erdős")]
    #[case(r"Gro\ss e", "Große")]
    #[case(r"{\AE}sop", "Æsop")]
    #[case(r"\o", "ø")]
    fn test_accents_and_letters(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(latex_to_text(input), expected);
    }

    #[rstest]
    #[case(r"Bread \& Butter", "Bread & Butter")]
    #[case(r"100\% pure", "100% pure")]
    #[case(r"\$5 \_ \# \{x\}", "$5 _ # {x}")]
    #[case(r"pages 10--20", "pages 10–20")]
    #[case(r"yes---no", "yes—no")]
    #[case(r"well-known", "well-known")]
    #[case(r"``quoted''", "\u{201C}quoted\u{201D}")]
    #[case(r"`single'", "\u{2018}single'")]
    #[case(r"Fig.~1", "Fig.\u{a0}1")]
    #[case(r"wait\ldots", "wait…")]
    #[case(r"hy\-phen", "hyphen")]
    fn test_symbols_and_punctuation(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(latex_to_text(input), expected);
    }

    #[rstest]
    #[case(r"{B}ayesian {N}etworks", "Bayesian Networks")]
    #[case(r"\emph{Deep} \textbf{Learning}", "Deep Learning")]
    #[case(r"\textit{\textsc{Nested}} commands", "Nested commands")]
    #[case(r"$\alpha$-stable $\beta_2$", "α-stable β_2")]
    #[case(r"$O(n \log n)$ sorting", "O(n log n) sorting")]
    #[case(r"\href{https://x.org}{Project page}", "Project page")]
    #[case(r"\url{https://x.org}", "https://x.org")]
    #[case("line one\\\\line two", "line one line two")]
    #[case("kept % dropped comment\nnext", "kept next")]
    fn test_commands_and_groups(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(latex_to_text(input), expected);
    }

    #[test]
    fn test_whitespace_is_collapsed_and_trimmed() {
        let input = "  A title\n    split over\tlines  ";
        assert_eq!(latex_to_text(input), "A title split over lines");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(latex_to_text(""), "");
        assert_eq!(latex_to_text("   \n"), "");
        assert_eq!(latex_to_text("{}"), "");
    }

    #[test]
    fn test_plain_unicode_passes_through() {
        assert_eq!(latex_to_text("Über naïve Größe — 東京"), "Über naïve Größe — 東京");
    }
}
