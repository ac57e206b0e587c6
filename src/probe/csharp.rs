//! Minimal C# declaration scanner
//!
//! Extracts the fully-qualified names of top-level type declarations from a
//! source file. It only understands what it needs: comments, string and char
//! literals, preprocessor lines, block and file-scoped namespaces, and the
//! `class`/`struct`/`interface`/`enum`/`record` keywords. Nested types are not
//! reported.

use std::iter::Peekable;
use std::str::Chars;

const TYPE_KEYWORDS: &[&str] = &["class", "struct", "interface", "enum", "record"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Dot,
    OpenBrace,
    CloseBrace,
    Semicolon,
    Other,
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line_start: bool,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line_start: true,
        }
    }

    fn skip_line(&mut self) {
        for c in self.chars.by_ref() {
            if c == '\n' {
                break;
            }
        }
        self.line_start = true;
    }

    fn skip_block_comment(&mut self) {
        let mut prev = '\0';
        for c in self.chars.by_ref() {
            if prev == '*' && c == '/' {
                return;
            }
            prev = c;
        }
    }

    /// Called after the opening quote
    fn skip_string(&mut self, verbatim: bool) {
        if self.chars.peek() == Some(&'"') {
            self.chars.next();
            if self.chars.peek() == Some(&'"') {
                self.chars.next();
                self.skip_raw_string();
            }
            return;
        }

        while let Some(c) = self.chars.next() {
            match c {
                '\\' if !verbatim => {
                    self.chars.next();
                }
                '"' if verbatim && self.chars.peek() == Some(&'"') => {
                    self.chars.next();
                }
                '"' => return,
                '\n' if !verbatim => return,
                _ => {}
            }
        }
    }

    fn skip_raw_string(&mut self) {
        let mut quotes = 0;
        for c in self.chars.by_ref() {
            if c == '"' {
                quotes += 1;
                if quotes == 3 {
                    return;
                }
            } else {
                quotes = 0;
            }
        }
    }

    fn skip_char_literal(&mut self) {
        while let Some(c) = self.chars.next() {
            match c {
                '\\' => {
                    self.chars.next();
                }
                '\'' | '\n' => return,
                _ => {}
            }
        }
    }

    fn read_ident(&mut self, first: char) -> String {
        let mut ident = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c == '_' || c.is_alphanumeric() {
                ident.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        ident
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let c = self.chars.next()?;
            if c == '\n' {
                self.line_start = true;
                continue;
            }
            if c.is_whitespace() {
                continue;
            }
            if c == '#' && self.line_start {
                self.skip_line();
                continue;
            }
            self.line_start = false;

            match c {
                '/' if self.chars.peek() == Some(&'/') => self.skip_line(),
                '/' if self.chars.peek() == Some(&'*') => {
                    self.chars.next();
                    self.skip_block_comment();
                }
                '"' => self.skip_string(false),
                '\'' => self.skip_char_literal(),
                '@' | '$' => {
                    let mut verbatim = c == '@';
                    while let Some(&p) = self.chars.peek() {
                        if p == '@' || p == '$' {
                            verbatim |= p == '@';
                            self.chars.next();
                        } else {
                            break;
                        }
                    }
                    match self.chars.peek() {
                        Some(&'"') => {
                            self.chars.next();
                            self.skip_string(verbatim);
                        }
                        Some(&p) if p == '_' || p.is_alphabetic() => {
                            self.chars.next();
                            return Some(Token::Ident(self.read_ident(p)));
                        }
                        _ => return Some(Token::Other),
                    }
                }
                '.' => return Some(Token::Dot),
                '{' => return Some(Token::OpenBrace),
                '}' => return Some(Token::CloseBrace),
                ';' => return Some(Token::Semicolon),
                c if c == '_' || c.is_alphabetic() => return Some(Token::Ident(self.read_ident(c))),
                _ => return Some(Token::Other),
            }
        }
    }
}

enum Scope {
    Namespace(String),
    Type,
    Other,
}

fn read_qualified_name(tokens: &mut Peekable<Lexer<'_>>) -> Option<String> {
    let Some(Token::Ident(first)) = tokens.next() else {
        return None;
    };
    let mut name = first;
    while tokens.peek() == Some(&Token::Dot) {
        tokens.next();
        match tokens.next() {
            Some(Token::Ident(part)) => {
                name.push('.');
                name.push_str(&part);
            }
            _ => return None,
        }
    }
    Some(name)
}

fn qualify(file_namespace: Option<&str>, scopes: &[Scope], name: &str) -> String {
    let mut parts: Vec<&str> = file_namespace.into_iter().collect();
    parts.extend(scopes.iter().filter_map(|s| match s {
        Scope::Namespace(ns) => Some(ns.as_str()),
        _ => None,
    }));
    parts.push(name);
    parts.join(".")
}

/// Fully-qualified names of the top-level types declared in `source`
pub fn declared_types(source: &str) -> Vec<String> {
    let mut tokens = Lexer::new(source).peekable();
    let mut scopes: Vec<Scope> = Vec::new();
    let mut file_namespace: Option<String> = None;
    let mut pending_namespace: Option<String> = None;
    let mut pending_type: Option<String> = None;
    // `record` and `record struct` may end at `;` with only a parameter list
    let mut pending_record = false;
    let mut expect_type_name = false;
    let mut types = Vec::new();

    while let Some(token) = tokens.next() {
        match token {
            Token::Ident(word) if word == "namespace" => {
                expect_type_name = false;
                let Some(name) = read_qualified_name(&mut tokens) else {
                    continue;
                };
                if tokens.peek() == Some(&Token::Semicolon) {
                    tokens.next();
                    if scopes.is_empty() {
                        file_namespace = Some(name);
                    }
                } else {
                    pending_namespace = Some(name);
                }
            }
            // `class` or `struct` after the name is a generic constraint
            Token::Ident(word)
                if TYPE_KEYWORDS.contains(&word.as_str()) && pending_type.is_none() =>
            {
                pending_record = word == "record" || (expect_type_name && pending_record);
                expect_type_name = true;
            }
            Token::Ident(word) if TYPE_KEYWORDS.contains(&word.as_str()) => {}
            Token::Ident(word) => {
                if expect_type_name {
                    pending_type = Some(word);
                    expect_type_name = false;
                }
            }
            Token::OpenBrace => {
                expect_type_name = false;
                pending_record = false;
                if let Some(ns) = pending_namespace.take() {
                    scopes.push(Scope::Namespace(ns));
                } else if let Some(name) = pending_type.take() {
                    if scopes.iter().all(|s| matches!(s, Scope::Namespace(_))) {
                        types.push(qualify(file_namespace.as_deref(), &scopes, &name));
                    }
                    scopes.push(Scope::Type);
                } else {
                    scopes.push(Scope::Other);
                }
            }
            Token::CloseBrace => {
                scopes.pop();
                pending_type = None;
                pending_record = false;
                expect_type_name = false;
            }
            Token::Semicolon => {
                if let Some(name) = pending_type.take() {
                    if pending_record && scopes.iter().all(|s| matches!(s, Scope::Namespace(_))) {
                        types.push(qualify(file_namespace.as_deref(), &scopes, &name));
                    }
                }
                pending_record = false;
                expect_type_name = false;
            }
            Token::Dot | Token::Other => expect_type_name = false,
        }
    }

    types
}
