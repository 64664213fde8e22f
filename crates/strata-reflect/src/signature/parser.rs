//! Recursive-descent parser for declarations
//!
//! ```text
//! declaration := ("package" qname ";")? modifier* (class | member)
//! class       := ("class" | "interface" | "enum") Ident typeParams? supertypes? "{" "}" ";"?
//! member      := type (Ident params? | params) ";"
//! params      := "(" (param ("," param)*)? ")"
//! param       := "final"? type "..."? Ident?
//! type        := qname typeArgs? ("[" "]")*
//! ```

use strata_runtime::{ClassKind, Modifiers, PrimitiveType, TypeRef};

use super::imports::ImportTable;
use super::lexer::{tokenize, Token};
use super::{Parameter, Signature, SignatureError};

/// Declaration parser bound to an import table and an optional owning class
#[derive(Debug, Clone, Copy)]
pub struct SignatureParser<'a> {
    imports: &'a ImportTable,
    owner: Option<&'a str>,
}

impl<'a> SignatureParser<'a> {
    /// Parser resolving simple names through `imports`
    pub fn new(imports: &'a ImportTable) -> Self {
        Self {
            imports,
            owner: None,
        }
    }

    /// Set the binary name of the class the declarations belong to.
    ///
    /// Its simple name resolves to it, and constructor keywords must match it.
    pub fn with_owner(mut self, owner: &'a str) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Parse one declaration
    pub fn parse(&self, declaration: &str) -> Result<Signature, SignatureError> {
        let tokens = tokenize(declaration)?;
        let mut cursor = Cursor {
            declaration,
            tokens,
            pos: 0,
        };
        let signature = self.parse_declaration(&mut cursor)?;
        if let Some(token) = cursor.peek() {
            return Err(cursor.malformed(format!("unexpected {} after declaration", token.describe())));
        }
        Ok(signature)
    }

    fn parse_declaration(&self, cursor: &mut Cursor<'_>) -> Result<Signature, SignatureError> {
        let package = if cursor.eat_ident("package") {
            let name = cursor.qualified_name()?;
            cursor.expect(Token::Semicolon)?;
            Some(name)
        } else {
            None
        };

        let modifiers = parse_modifiers(cursor)?;

        let class_kind = match cursor.peek() {
            Some(Token::Ident(kw)) => ClassKind::from_keyword(kw),
            _ => None,
        };
        if let Some(kind) = class_kind {
            cursor.bump();
            return parse_class(cursor, kind, modifiers, package);
        }
        if package.is_some() {
            return Err(cursor.malformed("package clause is only valid before a class declaration"));
        }

        let raw = parse_raw_type(cursor)?;
        if cursor.peek() == Some(Token::LParen) {
            let declared = self.constructor_type(cursor, &raw)?;
            let parameters = self.parse_parameters(cursor)?;
            cursor.expect(Token::Semicolon)?;
            return Ok(Signature::constructor(declared, parameters).with_modifiers(modifiers));
        }

        let name = cursor.ident("member name")?.to_string();
        let declared = self.resolve(cursor, &raw, true)?;
        if cursor.peek() == Some(Token::LParen) {
            let parameters = self.parse_parameters(cursor)?;
            cursor.expect(Token::Semicolon)?;
            return Ok(Signature::method(declared, name, parameters).with_modifiers(modifiers));
        }

        if declared.is_void() {
            return Err(cursor.malformed(format!("field `{}` cannot be void", name)));
        }
        cursor.expect(Token::Semicolon)?;
        Ok(Signature::field(declared, name).with_modifiers(modifiers))
    }

    fn constructor_type(&self, cursor: &Cursor<'_>, raw: &RawType) -> Result<TypeRef, SignatureError> {
        if raw.dims > 0 || PrimitiveType::from_keyword(&raw.name).is_some() {
            return Err(cursor.malformed(format!("`{}` is not a constructor name", raw.name)));
        }
        let keyword = raw.name.rsplit('.').next().unwrap_or(&raw.name);
        match self.owner {
            Some(owner) => {
                let owner_simple = strata_runtime::types::simple_class_name(owner);
                if keyword != owner_simple {
                    return Err(cursor.malformed(format!(
                        "constructor name `{}` does not match class `{}`",
                        keyword, owner_simple
                    )));
                }
                Ok(TypeRef::class(owner))
            }
            None => self.resolve(cursor, raw, false),
        }
    }

    fn parse_parameters(&self, cursor: &mut Cursor<'_>) -> Result<Vec<Parameter>, SignatureError> {
        cursor.expect(Token::LParen)?;
        let mut parameters = Vec::new();
        if cursor.eat(Token::RParen) {
            return Ok(parameters);
        }
        loop {
            cursor.eat_ident("final");
            let mut raw = parse_raw_type(cursor)?;
            let varargs = cursor.eat(Token::Ellipsis);
            if varargs {
                raw.dims += 1;
            }
            let ty = self.resolve(cursor, &raw, false)?;
            let name = match cursor.peek() {
                Some(Token::Ident(name)) => {
                    cursor.bump();
                    Some(name.to_string())
                }
                _ => None,
            };
            parameters.push(Parameter { ty, name });

            if cursor.eat(Token::RParen) {
                return Ok(parameters);
            }
            if varargs {
                return Err(cursor.malformed("varargs parameter must be last"));
            }
            cursor.expect(Token::Comma)?;
        }
    }

    fn resolve(&self, cursor: &Cursor<'_>, raw: &RawType, allow_void: bool) -> Result<TypeRef, SignatureError> {
        let base = if let Some(p) = PrimitiveType::from_keyword(&raw.name) {
            if p == PrimitiveType::Void && (!allow_void || raw.dims > 0) {
                return Err(cursor.malformed("`void` is only valid as a return type"));
            }
            TypeRef::Primitive(p)
        } else if raw.name.contains('.') {
            TypeRef::class(raw.name.clone())
        } else if let Some(binary) = self.imports.resolve(&raw.name) {
            TypeRef::class(binary)
        } else if let Some(owner) = self
            .owner
            .filter(|o| strata_runtime::types::simple_class_name(o) == raw.name)
        {
            TypeRef::class(owner)
        } else {
            return Err(SignatureError::UnresolvedType {
                declaration: cursor.declaration.to_string(),
                name: raw.name.clone(),
            });
        };
        Ok((0..raw.dims).fold(base, |ty, _| TypeRef::array(ty)))
    }
}

fn parse_modifiers(cursor: &mut Cursor<'_>) -> Result<Modifiers, SignatureError> {
    let mut modifiers = Modifiers::NONE;
    while let Some(Token::Ident(kw)) = cursor.peek() {
        let Some(modifier) = Modifiers::from_keyword(kw) else {
            break;
        };
        if modifiers.contains(modifier) {
            return Err(cursor.malformed(format!("duplicate modifier `{}`", kw)));
        }
        if modifier.intersects(Modifiers::VISIBILITY_MASK)
            && modifiers.intersects(Modifiers::VISIBILITY_MASK)
        {
            return Err(cursor.malformed(format!("conflicting visibility modifier `{}`", kw)));
        }
        modifiers |= modifier;
        cursor.bump();
    }
    Ok(modifiers)
}

fn parse_class(
    cursor: &mut Cursor<'_>,
    kind: ClassKind,
    modifiers: Modifiers,
    package: Option<String>,
) -> Result<Signature, SignatureError> {
    let name = cursor.ident("class name")?.to_string();
    if cursor.peek() == Some(Token::Lt) {
        skip_balanced(cursor)?;
    }
    for clause in ["extends", "implements"] {
        if cursor.eat_ident(clause) {
            loop {
                parse_raw_type(cursor)?;
                if !cursor.eat(Token::Comma) {
                    break;
                }
            }
        }
    }
    cursor.expect(Token::LBrace)?;
    cursor.expect(Token::RBrace)?;
    cursor.eat(Token::Semicolon);

    let mut signature = Signature::class(kind, name).with_modifiers(modifiers);
    signature.package = package;
    Ok(signature)
}

/// Type as written, before name resolution
#[derive(Debug, Clone)]
struct RawType {
    name: String,
    dims: usize,
}

fn parse_raw_type(cursor: &mut Cursor<'_>) -> Result<RawType, SignatureError> {
    let name = cursor.qualified_name()?;
    if cursor.peek() == Some(Token::Lt) {
        parse_type_arguments(cursor)?;
    }
    let mut dims = 0;
    while cursor.eat(Token::LBracket) {
        cursor.expect(Token::RBracket)?;
        dims += 1;
    }
    Ok(RawType { name, dims })
}

/// `<` arg (`,` arg)* `>`; arguments are checked and erased
fn parse_type_arguments(cursor: &mut Cursor<'_>) -> Result<(), SignatureError> {
    cursor.expect(Token::Lt)?;
    loop {
        if cursor.eat(Token::Question) {
            if cursor.eat_ident("extends") || cursor.eat_ident("super") {
                parse_raw_type(cursor)?;
            }
        } else {
            parse_raw_type(cursor)?;
        }
        if cursor.eat(Token::Gt) {
            return Ok(());
        }
        cursor.expect(Token::Comma)?;
    }
}

/// Skip a `<...>` group of a class declaration, nested groups included
fn skip_balanced(cursor: &mut Cursor<'_>) -> Result<(), SignatureError> {
    let mut depth = 0usize;
    while let Some(token) = cursor.peek() {
        cursor.bump();
        match token {
            Token::Lt => depth += 1,
            Token::Gt => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Token::LBrace | Token::RBrace | Token::Semicolon => break,
            _ => {}
        }
    }
    Err(cursor.malformed("unterminated type parameter list"))
}

struct Cursor<'s> {
    declaration: &'s str,
    tokens: Vec<(Token<'s>, std::ops::Range<usize>)>,
    pos: usize,
}

impl<'s> Cursor<'s> {
    fn peek(&self) -> Option<Token<'s>> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn eat(&mut self, token: Token<'s>) -> bool {
        if self.peek() == Some(token) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_ident(&mut self, keyword: &str) -> bool {
        match self.peek() {
            Some(Token::Ident(s)) if s == keyword => {
                self.bump();
                true
            }
            _ => false,
        }
    }

    fn expect(&mut self, token: Token<'s>) -> Result<(), SignatureError> {
        if self.eat(token) {
            return Ok(());
        }
        let found = self
            .peek()
            .map(|t| t.describe())
            .unwrap_or_else(|| "end of declaration".to_string());
        Err(self.malformed(format!("expected {}, found {}", token.describe(), found)))
    }

    fn ident(&mut self, what: &str) -> Result<&'s str, SignatureError> {
        match self.peek() {
            Some(Token::Ident(s)) => {
                self.bump();
                Ok(s)
            }
            other => {
                let found = other
                    .map(|t| t.describe())
                    .unwrap_or_else(|| "end of declaration".to_string());
                Err(self.malformed(format!("expected {}, found {}", what, found)))
            }
        }
    }

    fn qualified_name(&mut self) -> Result<String, SignatureError> {
        let mut name = self.ident("type name")?.to_string();
        while self.peek() == Some(Token::Dot) {
            self.bump();
            name.push('.');
            name.push_str(self.ident("name segment")?);
        }
        Ok(name)
    }

    fn malformed(&self, reason: impl Into<String>) -> SignatureError {
        SignatureError::Malformed {
            declaration: self.declaration.to_string(),
            reason: reason.into(),
        }
    }
}
