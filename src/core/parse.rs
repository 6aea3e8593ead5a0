/// Recursive-descent parser from scanner tokens to an [`Operation`] tree.
///
/// Syntax:
/// - `#key#` → `Symbol`, with `.name` / `.name(p, p)` modifier calls
/// - `[key:value]` → `Push`, `[key:a,b,c]` → `Push` of a `Select`
/// - `[key:POP]` → `Pop`
/// - everything else → `Literal`
///
/// The parser never fails. Unterminated actions, tags and parameter lists
/// end at the end of input with whatever was collected so far. Action values
/// and modifier parameters are re-parsed as documents of their own.
use crate::core::operation::{ModifierCall, Operation};
use crate::core::scan::{Scanner, TokenKind};

/// Keyword that turns an action into a pop.
const POP: &str = "POP";

/// Parse one source string.
pub fn parse(input: &str) -> Operation {
    let mut scanner = Scanner::new(input);
    let mut ops = Vec::new();

    loop {
        let op = match scanner.peek().kind {
            TokenKind::Eof | TokenKind::Error => break,
            TokenKind::LeftBracket => parse_action(&mut scanner),
            TokenKind::Octo => parse_tag(&mut scanner),
            _ => parse_literal(&mut scanner),
        };
        ops.push(op);
    }

    match ops.len() {
        0 => Operation::literal(""),
        1 => ops.remove(0),
        _ => Operation::Concat(ops),
    }
}

/// Parse several source strings into a single operation that picks one of
/// them at random.
pub fn parse_alternatives<S: AsRef<str>>(inputs: &[S]) -> Operation {
    let mut ops: Vec<Operation> = inputs.iter().map(|s| parse(s.as_ref())).collect();
    match ops.len() {
        0 => Operation::literal(""),
        1 => ops.remove(0),
        _ => Operation::Select(ops),
    }
}

/// Consume an identifier if one is next, otherwise yield an empty name.
fn parse_ident(scanner: &mut Scanner<'_>) -> String {
    if scanner.peek().kind == TokenKind::Text {
        scanner.next_token().value
    } else {
        String::new()
    }
}

/// Collect raw comma-separated values up to `close` (or end of input),
/// parsing each one as its own document.
fn parse_values(scanner: &mut Scanner<'_>, close: TokenKind) -> Vec<Operation> {
    let mut values = Vec::new();
    let mut raw = String::new();

    loop {
        let token = scanner.next_token();
        match token.kind {
            kind if kind == close || kind == TokenKind::Eof => {
                values.push(parse(&raw));
                return values;
            }
            TokenKind::Comma => {
                values.push(parse(&raw));
                raw.clear();
            }
            _ => raw.push_str(&token.value),
        }
    }
}

fn parse_action(scanner: &mut Scanner<'_>) -> Operation {
    // [
    scanner.next_token();
    let key = parse_ident(scanner);
    if scanner.peek().kind == TokenKind::Colon {
        scanner.next_token();
    }

    let head = scanner.peek();
    if head.kind == TokenKind::Text && head.value == POP {
        scanner.next_token();
        match scanner.peek().kind {
            TokenKind::RightBracket => {
                scanner.next_token();
                return Operation::pop(key);
            }
            TokenKind::Eof => return Operation::pop(key),
            // Not a bare POP; fall through with the word as text
            _ => {
                let mut values = parse_values(scanner, TokenKind::RightBracket);
                if let Some(first) = values.first_mut() {
                    *first = prepend_literal(POP, std::mem::replace(first, Operation::literal("")));
                }
                return push_values(key, values);
            }
        }
    }

    let values = parse_values(scanner, TokenKind::RightBracket);
    push_values(key, values)
}

fn push_values(key: String, mut values: Vec<Operation>) -> Operation {
    let value = if values.len() == 1 {
        values.remove(0)
    } else {
        Operation::Select(values)
    };
    Operation::push(key, value)
}

/// Put `text` in front of an already parsed value, keeping the tree flat.
fn prepend_literal(text: &str, op: Operation) -> Operation {
    match op {
        Operation::Literal(rest) => Operation::Literal(format!("{}{}", text, rest)),
        Operation::Concat(mut children) => {
            match children.first_mut() {
                Some(Operation::Literal(rest)) => rest.insert_str(0, text),
                _ => children.insert(0, Operation::literal(text)),
            }
            Operation::Concat(children)
        }
        other => Operation::Concat(vec![Operation::literal(text), other]),
    }
}

fn parse_tag(scanner: &mut Scanner<'_>) -> Operation {
    // #
    scanner.next_token();
    let key = parse_ident(scanner);
    let mut modifiers = Vec::new();

    loop {
        let token = scanner.next_token();
        match token.kind {
            TokenKind::Octo | TokenKind::Eof => break,
            TokenKind::Period => modifiers.push(parse_modifier(scanner)),
            // Stray tokens inside a tag are dropped
            _ => {}
        }
    }

    Operation::symbol_with(key, modifiers)
}

fn parse_modifier(scanner: &mut Scanner<'_>) -> ModifierCall {
    let name = parse_ident(scanner);
    if scanner.peek().kind != TokenKind::LeftParen {
        return ModifierCall::bare(name);
    }
    // (
    scanner.next_token();
    let params = parse_values(scanner, TokenKind::RightParen);
    ModifierCall::new(name, params)
}

fn parse_literal(scanner: &mut Scanner<'_>) -> Operation {
    let mut text = String::new();
    loop {
        match scanner.peek().kind {
            TokenKind::LeftBracket | TokenKind::Octo | TokenKind::Eof | TokenKind::Error => break,
            _ => text.push_str(&scanner.next_token().value),
        }
    }
    Operation::Literal(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(v: &str) -> Operation {
        Operation::literal(v)
    }

    #[test]
    fn literals() {
        let cases = [
            ("", ""),
            ("a", "a"),
            ("A complete sentence, oh my.", "A complete sentence, oh my."),
            ("12,3456.7890", "12,3456.7890"),
            ("\\[\\]", "[]"),
            ("\\#", "#"),
            ("\\\\", "\\"),
            ("\\#sym\\#", "#sym#"),
            ("\\[key:literal\\]", "[key:literal]"),
            ("stray ] and ) here", "stray ] and ) here"),
        ];
        for (input, expected) in cases {
            assert_eq!(parse(input), lit(expected), "input {:?}", input);
        }
    }

    #[test]
    fn symbols() {
        assert_eq!(parse("#sym#"), Operation::symbol("sym"));
        assert_eq!(parse("#symBol#"), Operation::symbol("symBol"));
        assert_eq!(parse("#sym_bol#"), Operation::symbol("sym_bol"));
        assert_eq!(parse("##"), Operation::symbol(""));
    }

    #[test]
    fn symbols_with_modifiers() {
        assert_eq!(
            parse("#sym.mod#"),
            Operation::symbol_with("sym", vec![ModifierCall::bare("mod")])
        );
        assert_eq!(
            parse("#sym.mod.mod.mod#"),
            Operation::symbol_with(
                "sym",
                vec![
                    ModifierCall::bare("mod"),
                    ModifierCall::bare("mod"),
                    ModifierCall::bare("mod")
                ]
            )
        );
        assert_eq!(
            parse("#sym.mod(param)#"),
            Operation::symbol_with("sym", vec![ModifierCall::new("mod", vec![lit("param")])])
        );
        assert_eq!(
            parse("#sym.mod(par,am)#"),
            Operation::symbol_with(
                "sym",
                vec![ModifierCall::new("mod", vec![lit("par"), lit("am")])]
            )
        );
    }

    #[test]
    fn modifier_params_are_documents() {
        assert_eq!(
            parse("#x.m(#y.hot#,[z:1]a)#"),
            Operation::symbol_with(
                "x",
                vec![ModifierCall::new(
                    "m",
                    vec![
                        Operation::symbol_with("y", vec![ModifierCall::bare("hot")]),
                        Operation::Concat(vec![Operation::push("z", lit("1")), lit("a")]),
                    ]
                )]
            )
        );
    }

    #[test]
    fn actions() {
        assert_eq!(parse("[act:lit]"), Operation::push("act", lit("lit")));
        assert_eq!(parse("[:lit]"), Operation::push("", lit("lit")));
        assert_eq!(
            parse("[act:lit,lit]"),
            Operation::push("act", Operation::Select(vec![lit("lit"), lit("lit")]))
        );
        assert_eq!(parse("[act:lit\\,eral]"), Operation::push("act", lit("lit,eral")));
        assert_eq!(parse("[act:POP]"), Operation::pop("act"));
        assert_eq!(parse("[act:]"), Operation::push("act", lit("")));
    }

    #[test]
    fn action_values_are_documents() {
        assert_eq!(
            parse("[y:a,#b#]"),
            Operation::push(
                "y",
                Operation::Select(vec![lit("a"), Operation::symbol("b")])
            )
        );
        assert_eq!(
            parse("[thing:#colour#]"),
            Operation::push("thing", Operation::symbol("colour"))
        );
    }

    #[test]
    fn pop_only_as_whole_body() {
        assert_eq!(
            parse("[act:POP now]"),
            Operation::push("act", lit("POP now"))
        );
        assert_eq!(
            parse("[act:POP,a]"),
            Operation::push("act", Operation::Select(vec![lit("POP"), lit("a")]))
        );
        assert_eq!(
            parse("[act:POP#x#]"),
            Operation::push(
                "act",
                Operation::Concat(vec![lit("POP"), Operation::symbol("x")])
            )
        );
        assert_eq!(parse("[act:POP"), Operation::pop("act"));
    }

    #[test]
    fn documents_combine() {
        assert_eq!(
            parse("[x:a]#x# and #y#"),
            Operation::Concat(vec![
                Operation::push("x", lit("a")),
                Operation::symbol("x"),
                lit(" and "),
                Operation::symbol("y"),
            ])
        );
    }

    #[test]
    fn unterminated_constructs_are_lenient() {
        assert_eq!(parse("#sym"), Operation::symbol("sym"));
        assert_eq!(parse("#sym.mod(a,b"), Operation::symbol_with(
            "sym",
            vec![ModifierCall::new("mod", vec![lit("a"), lit("b")])]
        ));
        assert_eq!(parse("[x:a"), Operation::push("x", lit("a")));
        assert_eq!(parse("[x:a,b"), Operation::push("x", Operation::Select(vec![lit("a"), lit("b")])));
        assert_eq!(parse("["), Operation::push("", lit("")));
        assert_eq!(parse("#"), Operation::symbol(""));
        assert_eq!(parse("[x]rest"), Operation::Concat(vec![
            Operation::push("x", lit("")),
            lit("rest"),
        ]));
    }

    #[test]
    fn stray_tokens_in_tags_are_dropped() {
        assert_eq!(parse("#a b#"), Operation::symbol("a"));
    }

    #[test]
    fn alternatives() {
        assert_eq!(parse_alternatives::<&str>(&[]), lit(""));
        assert_eq!(parse_alternatives(&["#a#"]), Operation::symbol("a"));
        assert_eq!(
            parse_alternatives(&["a", "b"]),
            Operation::Select(vec![lit("a"), lit("b")])
        );
    }
}
