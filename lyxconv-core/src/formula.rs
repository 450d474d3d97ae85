//! Formula translation
//!
//! Formula insets carry TeX math. During local processing the text is handed
//! to a [`FormulaTranslator`], which returns a pre-rendered HTML fragment that
//! the renderer later splices into the output unchanged.
//!
//! [`BasicFormulaTranslator`] covers the common subset: Greek letters and
//! operator symbols, sub- and superscripts, `\frac`, `\sqrt`, font commands
//! and grouping. Unknown commands are kept as their name.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Translates raw formula text into a markup fragment.
///
/// Implementations are pure: the same input always gives the same fragment.
pub trait FormulaTranslator: Send + Sync {
    fn translate(&self, raw: &str) -> String;
}

static SYMBOLS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("alpha", "α"),
        ("beta", "β"),
        ("gamma", "γ"),
        ("delta", "δ"),
        ("epsilon", "ϵ"),
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
        ("phi", "ϕ"),
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
        ("times", "×"),
        ("cdot", "·"),
        ("pm", "±"),
        ("mp", "∓"),
        ("div", "÷"),
        ("leq", "≤"),
        ("le", "≤"),
        ("geq", "≥"),
        ("ge", "≥"),
        ("neq", "≠"),
        ("ne", "≠"),
        ("approx", "≈"),
        ("equiv", "≡"),
        ("sim", "∼"),
        ("infty", "∞"),
        ("partial", "∂"),
        ("nabla", "∇"),
        ("sum", "∑"),
        ("prod", "∏"),
        ("int", "∫"),
        ("oint", "∮"),
        ("in", "∈"),
        ("notin", "∉"),
        ("subset", "⊂"),
        ("subseteq", "⊆"),
        ("cup", "∪"),
        ("cap", "∩"),
        ("forall", "∀"),
        ("exists", "∃"),
        ("neg", "¬"),
        ("wedge", "∧"),
        ("vee", "∨"),
        ("to", "→"),
        ("rightarrow", "→"),
        ("leftarrow", "←"),
        ("Rightarrow", "⇒"),
        ("Leftarrow", "⇐"),
        ("leftrightarrow", "↔"),
        ("Leftrightarrow", "⇔"),
        ("ldots", "…"),
        ("cdots", "⋯"),
        ("emptyset", "∅"),
        ("quad", "\u{2003}"),
        ("qquad", "\u{2003}\u{2003}"),
        (",", "\u{2009}"),
        (";", "\u{2005}"),
        (" ", " "),
        ("{", "{"),
        ("}", "}"),
        ("%", "%"),
        ("$", "$"),
        ("&", "&amp;"),
        ("left", ""),
        ("right", ""),
    ])
});

/// Functions set upright rather than in italics.
const FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "log", "ln", "exp", "lim", "max", "min", "det", "sup", "inf",
];

/// Translator for the common TeX math subset.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicFormulaTranslator;

impl FormulaTranslator for BasicFormulaTranslator {
    fn translate(&self, raw: &str) -> String {
        let (body, display) = strip_delimiters(raw.trim());
        let chars: Vec<char> = body.chars().collect();
        let mut math = MathWriter::new(&chars);
        let inner = math.sequence(None);
        if display {
            format!("<div class=\"formula\">{inner}</div>")
        } else {
            format!("<span class=\"formula\">{inner}</span>")
        }
    }
}

/// Remove math delimiters; reports whether the formula is displayed.
fn strip_delimiters(raw: &str) -> (&str, bool) {
    if let Some(inner) = raw.strip_prefix("$$").and_then(|r| r.strip_suffix("$$")) {
        return (inner, true);
    }
    if let Some(inner) = raw.strip_prefix("\\[").and_then(|r| r.strip_suffix("\\]")) {
        return (inner, true);
    }
    if let Some(inner) = raw.strip_prefix('$').and_then(|r| r.strip_suffix('$')) {
        return (inner, false);
    }
    if let Some(rest) = raw.strip_prefix("\\begin{") {
        // environments such as equation or align
        if let Some(close) = rest.find('}') {
            let name = &rest[..close];
            let end = format!("\\end{{{name}}}");
            let body = rest[close + 1..].trim_end();
            return (body.strip_suffix(end.as_str()).unwrap_or(body), true);
        }
    }
    (raw, false)
}

struct MathWriter<'a> {
    chars: &'a [char],
    pos: usize,
}

impl<'a> MathWriter<'a> {
    fn new(chars: &'a [char]) -> Self {
        Self { chars, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Translate until `close` (exclusive) or the end of input.
    fn sequence(&mut self, close: Option<char>) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if Some(c) == close {
                self.pos += 1;
                return out;
            }
            out.push_str(&self.item());
        }
        out
    }

    /// One atom with its scripts.
    fn item(&mut self) -> String {
        let Some(c) = self.peek() else {
            return String::new();
        };
        self.pos += 1;
        match c {
            '^' => format!("<sup>{}</sup>", self.argument()),
            '_' => format!("<sub>{}</sub>", self.argument()),
            '{' => self.sequence(Some('}')),
            '\\' => self.command(),
            '&' => " ".to_string(),
            '~' => "\u{a0}".to_string(),
            c if c.is_ascii_alphabetic() => format!("<i>{c}</i>"),
            c if c.is_whitespace() => {
                while self.peek().is_some_and(char::is_whitespace) {
                    self.pos += 1;
                }
                String::new()
            }
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            c => c.to_string(),
        }
    }

    /// A braced group or a single atom.
    fn argument(&mut self) -> String {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        match self.peek() {
            Some('{') => {
                self.pos += 1;
                self.sequence(Some('}'))
            }
            Some(_) => self.item(),
            None => String::new(),
        }
    }

    fn command_name(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        if self.pos == start {
            // control symbol such as \, or \{
            if let Some(c) = self.peek() {
                self.pos += 1;
                return c.to_string();
            }
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn command(&mut self) -> String {
        let name = self.command_name();
        if let Some(symbol) = SYMBOLS.get(name.as_str()) {
            return symbol.to_string();
        }
        if FUNCTIONS.contains(&name.as_str()) {
            return name;
        }
        match name.as_str() {
            "frac" | "dfrac" | "tfrac" => {
                let numerator = self.argument();
                let denominator = self.argument();
                format!(
                    "<span class=\"fraction\"><span class=\"numerator\">{numerator}</span>/<span class=\"denominator\">{denominator}</span></span>"
                )
            }
            "sqrt" => format!("√<span class=\"radicand\">{}</span>", self.argument()),
            "mathrm" | "text" | "textrm" | "operatorname" => {
                format!("<span class=\"upright\">{}</span>", self.plain_argument())
            }
            "mathbf" | "textbf" | "boldsymbol" => format!("<b>{}</b>", self.argument()),
            "mathit" | "textit" => format!("<i>{}</i>", self.plain_argument()),
            "label" | "nonumber" | "notag" => {
                if name == "label" {
                    self.argument();
                }
                String::new()
            }
            "\\" => "<br/>".to_string(),
            other => other.to_string(),
        }
    }

    /// Argument kept as written, without italicising letters.
    fn plain_argument(&mut self) -> String {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        if self.peek() != Some('{') {
            return self.item();
        }
        self.pos += 1;
        let mut depth = 1;
        let mut text = String::new();
        while let Some(c) = self.peek() {
            self.pos += 1;
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                '<' => {
                    text.push_str("&lt;");
                    continue;
                }
                '>' => {
                    text.push_str("&gt;");
                    continue;
                }
                _ => {}
            }
            text.push(c);
        }
        text
    }
}
