//! # Dragnet's search-bar query syntax
//!
//! `dragnet-syntax` turns the free text a user types into a search box into a
//! structured expression tree, so the rest of Dragnet can lower it into a
//! backend query without re-deriving the parsing rules. The language is the
//! familiar log-search one: bare words, quoted phrases, `field:value` pairs,
//! comparators, and `and`/`or`/`not` keywords.
//!
//! Parsing is deliberately total. The input is live, half-typed text from an
//! interactive search box, so every malformed fragment degrades to a
//! best-effort tree instead of an error; an input with nothing usable in it
//! parses to [`Expr::MatchAll`].
//!
//! ## Example
//! ```
//! use dragnet_syntax::{parse, Expr, Scalar};
//!
//! let query = parse("host.name:host-1 and status:200");
//! if let Expr::And(parts) = &query.expr {
//!     assert!(matches!(&parts[0], Expr::FieldIs { field, .. } if field == "host.name"));
//!     assert!(matches!(&parts[1], Expr::FieldIs { value: Scalar::Num(n), .. } if *n == 200.0));
//! }
//! ```

/// Parses a search-bar query string into an expression tree. Total: malformed
/// input degrades rather than failing.
pub fn parse(input: &str) -> Query {
    Parser::new(tokenize(input)).parse()
}

/// User input normalized into a single expression tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub expr: Expr,
}

impl Query {
    pub fn is_match_all(&self) -> bool {
        matches!(self.expr, Expr::MatchAll)
    }
}

/// Token classes emitted by [`tokenize`]. Whitespace only separates tokens
/// and is never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare word: a field name, a value, or free text; the parser decides.
    Literal,
    /// Interior of a `"..."` segment, quotes stripped, no escape processing.
    Quoted,
    /// A lone `*`.
    Wildcard,
    And,
    Or,
    Not,
    Colon,
    LParen,
    RParen,
    /// One of `<`, `<=`, `>`, `>=`.
    Comparator,
}

/// One lexed token. `position` is the byte offset of the token start in the
/// original input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, text: &str, position: usize) -> Self {
        Self {
            kind,
            text: text.to_string(),
            position,
        }
    }
}

/// Splits the raw query string into tokens. Total: unrecognized characters
/// fold into the surrounding literal and an unterminated quote swallows the
/// remainder of the input.
///
/// ```
/// use dragnet_syntax::{tokenize, TokenKind};
/// let tokens = tokenize("status >= 500");
/// assert_eq!(tokens[1].kind, TokenKind::Comparator);
/// assert_eq!(tokens[1].text, ">=");
/// ```
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < input.len() {
        let rest = &input[pos..];
        let ch = match rest.chars().next() {
            Some(ch) => ch,
            None => break,
        };
        if ch.is_whitespace() {
            pos += ch.len_utf8();
            continue;
        }
        let start = pos;
        match ch {
            '(' => {
                tokens.push(Token::new(TokenKind::LParen, "(", start));
                pos += 1;
            }
            ')' => {
                tokens.push(Token::new(TokenKind::RParen, ")", start));
                pos += 1;
            }
            ':' => {
                tokens.push(Token::new(TokenKind::Colon, ":", start));
                pos += 1;
            }
            '<' | '>' => {
                let len = if rest[1..].starts_with('=') { 2 } else { 1 };
                tokens.push(Token::new(TokenKind::Comparator, &rest[..len], start));
                pos += len;
            }
            '"' => {
                let body = &rest[1..];
                match body.find('"') {
                    Some(end) => {
                        tokens.push(Token::new(TokenKind::Quoted, &body[..end], start));
                        pos += end + 2;
                    }
                    None => {
                        tokens.push(Token::new(TokenKind::Quoted, body, start));
                        pos = input.len();
                    }
                }
            }
            _ => {
                let end = rest.find(is_term_breaker).unwrap_or(rest.len());
                let text = &rest[..end];
                tokens.push(Token::new(classify_word(text), text, start));
                pos += end;
            }
        }
    }
    tokens
}

fn is_term_breaker(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | ':' | '<' | '>' | '"')
}

fn classify_word(text: &str) -> TokenKind {
    if text.eq_ignore_ascii_case("and") {
        TokenKind::And
    } else if text.eq_ignore_ascii_case("or") {
        TokenKind::Or
    } else if text.eq_ignore_ascii_case("not") {
        TokenKind::Not
    } else if text == "*" {
        TokenKind::Wildcard
    } else {
        TokenKind::Literal
    }
}

/// A value attached to a query leaf. Bare tokens coerce to the narrowest
/// matching type; quoted tokens always stay strings.
///
/// ```
/// use dragnet_syntax::{parse, Expr, Scalar};
/// let Expr::FieldIs { value, .. } = parse("up:true").expr else { panic!() };
/// assert_eq!(value, Scalar::Bool(true));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl Scalar {
    fn from_bare(text: &str) -> Self {
        if text.eq_ignore_ascii_case("true") {
            return Scalar::Bool(true);
        }
        if text.eq_ignore_ascii_case("false") {
            return Scalar::Bool(false);
        }
        let numeric_lead = text
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
        if numeric_lead {
            if let Ok(number) = text.parse::<f64>() {
                if number.is_finite() {
                    return Scalar::Num(number);
                }
            }
        }
        Scalar::Str(text.to_string())
    }

    /// The raw text form, used by consumers that need to inspect wildcards.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(text) => Some(text),
            _ => None,
        }
    }
}

/// Logical structure of a parsed query.
///
/// `And`/`Or` store flat vectors instead of binary trees so consumers can
/// iterate operands without rebalancing. `MatchAll` is the tolerant
/// fallback: it stands for "no text filter" and is what whitespace-only or
/// unusable input parses to.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// No constraint. `parse("")` and `parse("*")` both produce this.
    ///
    /// ```
    /// use dragnet_syntax::{parse, Expr};
    /// assert!(matches!(parse("   ").expr, Expr::MatchAll));
    /// ```
    MatchAll,
    /// A bare term with no declared field, matched against full-text fields.
    Literal { value: Scalar },
    /// `field:value`: exact or phrase match on one field.
    ///
    /// ```
    /// use dragnet_syntax::{parse, Expr};
    /// let Expr::FieldIs { field, is_phrase, .. } = parse("app:\"api gateway\"").expr else { panic!() };
    /// assert_eq!(field, "app");
    /// assert!(is_phrase);
    /// ```
    FieldIs {
        field: String,
        value: Scalar,
        is_phrase: bool,
    },
    /// A bounded comparison, from `field >= v` / `field < v` forms. Two
    /// opposite single-bound comparisons on one field inside a conjunction
    /// merge into a single node carrying both bounds.
    FieldRange {
        field: String,
        from: Option<Scalar>,
        to: Option<Scalar>,
        from_inclusive: bool,
        to_inclusive: bool,
    },
    /// `field:*`: the field is present on the document.
    FieldExists { field: String },
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
}

/// Hand-rolled recursive-descent parser. The language is tiny and the
/// tolerance rules (half-typed input must still produce a tree) are easier
/// to state against explicit control flow than a grammar generator.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    // Top level keeps consuming until the token stream is exhausted so stray
    // closers ("(a) ) b") degrade into an implicit conjunction instead of
    // dropping the tail.
    fn parse(mut self) -> Query {
        let mut parts = Vec::new();
        while self.pos < self.tokens.len() {
            let before = self.pos;
            push_operand(&mut parts, self.parse_or());
            if self.pos == before {
                // stuck on a token no rule wants (e.g. an unmatched ')')
                self.pos += 1;
            }
        }
        merge_ranges(&mut parts);
        Query {
            expr: fold_and(parts),
        }
    }

    fn parse_or(&mut self) -> Expr {
        let mut parts = Vec::new();
        push_operand(&mut parts, self.parse_and());
        while self.eat(TokenKind::Or) {
            push_operand(&mut parts, self.parse_and());
        }
        fold_or(parts)
    }

    // AND is explicit via the keyword or implicit between adjacent operands,
    // the way every search box treats whitespace.
    fn parse_and(&mut self) -> Expr {
        let mut parts = Vec::new();
        loop {
            push_operand(&mut parts, self.parse_not());
            if self.eat(TokenKind::And) {
                continue;
            }
            if self.at_operand() {
                continue;
            }
            break;
        }
        merge_ranges(&mut parts);
        fold_and(parts)
    }

    // `not not x` cancels, so count prefixes and wrap once on odd parity.
    fn parse_not(&mut self) -> Expr {
        let mut negations = 0usize;
        while self.eat(TokenKind::Not) {
            negations += 1;
        }
        let expr = self.parse_primary();
        if negations % 2 == 1 && !matches!(expr, Expr::MatchAll) {
            Expr::Not(Box::new(expr))
        } else {
            expr
        }
    }

    fn parse_primary(&mut self) -> Expr {
        match self.peek_kind() {
            None => Expr::MatchAll,
            Some(TokenKind::LParen) => {
                self.pos += 1;
                let inner = self.parse_or();
                self.eat(TokenKind::RParen);
                inner
            }
            Some(TokenKind::Quoted) => {
                let text = self.bump_text();
                Expr::Literal {
                    value: Scalar::Str(text),
                }
            }
            Some(TokenKind::Wildcard) => {
                self.pos += 1;
                Expr::MatchAll
            }
            Some(TokenKind::Literal) => self.parse_term(),
            // an operator or closer in operand position; the caller decides
            // whether to skip it
            Some(_) => Expr::MatchAll,
        }
    }

    // A literal is a field name when followed by `:` or a comparator, and
    // plain free text otherwise.
    fn parse_term(&mut self) -> Expr {
        let word = self.bump_text();
        match self.peek_kind() {
            Some(TokenKind::Colon) => {
                self.pos += 1;
                self.parse_field_value(word)
            }
            Some(TokenKind::Comparator) => {
                let op = self.bump_text();
                match self.peek_kind() {
                    Some(kind @ (TokenKind::Literal | TokenKind::Quoted)) => {
                        let text = self.bump_text();
                        let value = if kind == TokenKind::Quoted {
                            Scalar::Str(text)
                        } else {
                            Scalar::from_bare(&text)
                        };
                        range_from_comparator(word, &op, value)
                    }
                    // comparator with nothing after it yet
                    _ => Expr::Literal {
                        value: Scalar::Str(word),
                    },
                }
            }
            _ => Expr::Literal {
                value: Scalar::Str(word),
            },
        }
    }

    fn parse_field_value(&mut self, field: String) -> Expr {
        match self.peek_kind() {
            Some(TokenKind::Quoted) => {
                let text = self.bump_text();
                Expr::FieldIs {
                    field,
                    value: Scalar::Str(text),
                    is_phrase: true,
                }
            }
            Some(TokenKind::Wildcard) => {
                self.pos += 1;
                Expr::FieldExists { field }
            }
            Some(TokenKind::Literal) => {
                let text = self.bump_text();
                Expr::FieldIs {
                    field,
                    value: Scalar::from_bare(&text),
                    is_phrase: false,
                }
            }
            Some(TokenKind::LParen) => {
                self.pos += 1;
                let group = self.parse_value_or(&field);
                self.eat(TokenKind::RParen);
                if matches!(group, Expr::MatchAll) {
                    // `field:()`, nothing usable, keep the name as free text
                    Expr::Literal {
                        value: Scalar::Str(field),
                    }
                } else {
                    group
                }
            }
            // `field:` typed mid-keystroke
            _ => Expr::Literal {
                value: Scalar::Str(field),
            },
        }
    }

    // `field:(a or b)` binds every value in the group to the same field.
    // Adjacency inside a group reads as a value list, so it folds to OR.
    fn parse_value_or(&mut self, field: &str) -> Expr {
        let mut parts = Vec::new();
        loop {
            push_operand(&mut parts, self.parse_value_and(field));
            if self.eat(TokenKind::Or) {
                continue;
            }
            if self.at_operand() {
                continue;
            }
            break;
        }
        fold_or(parts)
    }

    fn parse_value_and(&mut self, field: &str) -> Expr {
        let mut parts = Vec::new();
        push_operand(&mut parts, self.parse_value_not(field));
        while self.eat(TokenKind::And) {
            push_operand(&mut parts, self.parse_value_not(field));
        }
        fold_and(parts)
    }

    fn parse_value_not(&mut self, field: &str) -> Expr {
        let mut negations = 0usize;
        while self.eat(TokenKind::Not) {
            negations += 1;
        }
        let expr = self.parse_value_atom(field);
        if negations % 2 == 1 && !matches!(expr, Expr::MatchAll) {
            Expr::Not(Box::new(expr))
        } else {
            expr
        }
    }

    fn parse_value_atom(&mut self, field: &str) -> Expr {
        match self.peek_kind() {
            Some(TokenKind::Literal) => {
                let text = self.bump_text();
                Expr::FieldIs {
                    field: field.to_string(),
                    value: Scalar::from_bare(&text),
                    is_phrase: false,
                }
            }
            Some(TokenKind::Quoted) => {
                let text = self.bump_text();
                Expr::FieldIs {
                    field: field.to_string(),
                    value: Scalar::Str(text),
                    is_phrase: true,
                }
            }
            Some(TokenKind::Wildcard) => {
                self.pos += 1;
                Expr::FieldExists {
                    field: field.to_string(),
                }
            }
            Some(TokenKind::LParen) => {
                self.pos += 1;
                let inner = self.parse_value_or(field);
                self.eat(TokenKind::RParen);
                inner
            }
            _ => Expr::MatchAll,
        }
    }

    fn at_operand(&self) -> bool {
        matches!(
            self.peek_kind(),
            Some(
                TokenKind::Literal
                    | TokenKind::Quoted
                    | TokenKind::Wildcard
                    | TokenKind::LParen
                    | TokenKind::Not
            )
        )
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|token| token.kind)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn bump_text(&mut self) -> String {
        let text = self.tokens[self.pos].text.clone();
        self.pos += 1;
        text
    }
}

fn range_from_comparator(field: String, op: &str, value: Scalar) -> Expr {
    let (lower, inclusive) = match op {
        ">" => (true, false),
        ">=" => (true, true),
        "<" => (false, false),
        _ => (false, true), // "<="
    };
    if lower {
        Expr::FieldRange {
            field,
            from: Some(value),
            to: None,
            from_inclusive: inclusive,
            to_inclusive: false,
        }
    } else {
        Expr::FieldRange {
            field,
            from: None,
            to: Some(value),
            from_inclusive: false,
            to_inclusive: inclusive,
        }
    }
}

fn push_operand(parts: &mut Vec<Expr>, expr: Expr) {
    if !matches!(expr, Expr::MatchAll) {
        parts.push(expr);
    }
}

fn fold_and(mut parts: Vec<Expr>) -> Expr {
    match parts.len() {
        0 => Expr::MatchAll,
        1 => parts.remove(0),
        _ => Expr::And(parts),
    }
}

fn fold_or(mut parts: Vec<Expr>) -> Expr {
    match parts.len() {
        0 => Expr::MatchAll,
        1 => parts.remove(0),
        _ => Expr::Or(parts),
    }
}

/// Collapses `field >= a` and `field < b` inside one conjunction into a
/// single two-bound range on the first occurrence. Only opposite-direction
/// single-bound ranges on the same field merge; everything else keeps its
/// position.
fn merge_ranges(parts: &mut Vec<Expr>) {
    let mut out: Vec<Expr> = Vec::with_capacity(parts.len());
    for expr in parts.drain(..) {
        match expr {
            Expr::FieldRange {
                field,
                from,
                to,
                from_inclusive,
                to_inclusive,
            } if from.is_some() != to.is_some() => {
                let has_lower = from.is_some();
                let target = out.iter().position(|candidate| match candidate {
                    Expr::FieldRange {
                        field: other,
                        from: other_from,
                        to: other_to,
                        ..
                    } => {
                        *other == field
                            && (other_from.is_some() != other_to.is_some())
                            && (other_from.is_some() != has_lower)
                    }
                    _ => false,
                });
                match target {
                    Some(index) => {
                        if let Expr::FieldRange {
                            from: dst_from,
                            to: dst_to,
                            from_inclusive: dst_from_inclusive,
                            to_inclusive: dst_to_inclusive,
                            ..
                        } = &mut out[index]
                        {
                            if has_lower {
                                *dst_from = from;
                                *dst_from_inclusive = from_inclusive;
                            } else {
                                *dst_to = to;
                                *dst_to_inclusive = to_inclusive;
                            }
                        }
                    }
                    None => out.push(Expr::FieldRange {
                        field,
                        from,
                        to,
                        from_inclusive,
                        to_inclusive,
                    }),
                }
            }
            other => out.push(other),
        }
    }
    *parts = out;
}
