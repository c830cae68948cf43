// Integration tests for the canonical textual rendering of parsed trees

use veles::parser::{Dialect, Statement, TokenKind};

fn render(source: &str) -> String {
    veles::parse_source(source, Dialect::Vs, "render.vs")
        .expect("Parsing failed")
        .to_string()
}

fn kinds(source: &str) -> Vec<TokenKind> {
    veles::tokenize(source, Dialect::Vs)
        .expect("Tokenizing failed")
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

fn single_statement(source: &str) -> Statement {
    let program = veles::parse_source(source, Dialect::Vs, "render.vs").expect("Parsing failed");
    assert_eq!(program.statements.len(), 1);
    program.statements.into_iter().next().unwrap()
}

#[test]
fn test_simple_expressions_are_idempotent() {
    for source in ["42", "3.5", "\"hello\"", "true", "counter", "a + b", "x * 2", "f(1, 2)"] {
        let once = render(source);
        let twice = render(&once);

        assert_eq!(once, format!("{source}\n"));
        assert_eq!(twice, once, "source {source:?}");
    }
}

#[test]
fn test_nested_expressions_are_parenthesised() {
    assert_eq!(render("1 + 2 * 3"), "1 + (2 * 3)\n");
    assert_eq!(render("8 - 3 - 2"), "(8 - 3) - 2\n");
    assert_eq!(render("2 ** 3 ** 2"), "2 ** (3 ** 2)\n");
    assert_eq!(render("x = y = 0"), "x = (y = 0)\n");
}

#[test]
fn test_parenthesised_rendering_reparses_to_same_tree() {
    for source in ["1 + 2 * 3", "(1 + 2) * 3", "-a ** 2", "a && !b || c == d"] {
        let first = single_statement(source);
        let second = single_statement(&first.to_string());

        assert_eq!(first.to_string(), second.to_string(), "source {source:?}");
    }
}

#[test]
fn test_use_round_trips_token_for_token() {
    for source in ["use math", "use math::trig", "use math::trig as t"] {
        let statement = single_statement(source);
        let rendered = statement.to_string();

        assert_eq!(rendered, source);
        assert_eq!(kinds(&rendered), kinds(source));
    }
}

#[test]
fn test_declarations() {
    assert_eq!(render("let i32 x"), "let i32 x\n");
    assert_eq!(render("pub let bool ok = !false"), "pub let bool ok = !false\n");
    assert_eq!(render("fn :: noop"), "fn :: noop()\n");
    assert_eq!(render("extern fn f64 :: sqrt(f64 x)"), "extern fn f64 :: sqrt(f64 x)\n");
}

#[test]
fn test_blocks_are_indented() {
    let source = "pub fn i32 :: abs(i32 x) {\nif x < 0 {\nreturn -x\n}\nreturn x\n}";

    assert_eq!(
        render(source),
        "pub fn i32 :: abs(i32 x) {\n\tif x < 0 {\n\t\treturn -x\n\t}\n\treturn x\n}\n"
    );
}

#[test]
fn test_extern_block() {
    assert_eq!(
        render("extern { fn i32 :: add(i32 a, i32 b); fn :: flush() }"),
        "extern {\n\tfn i32 :: add(i32 a, i32 b)\n\tfn :: flush()\n}\n"
    );
}

#[test]
fn test_rendered_program_reparses() {
    let source = "use io\nfn i32 :: main() {\n\tlet i32 x = 2 * (3 + 4)\n\tdrop x\n\treturn x\n}\n";
    let once = render(source);

    assert_eq!(render(&once), once);
}

#[test]
fn test_json_output() {
    let program = veles::parse_source("let i32 x = 1", Dialect::Vs, "json.vs").unwrap();
    let json = serde_json::to_value(&program).unwrap();

    assert_eq!(json["file_id"], "json.vs");
    assert_eq!(json["dialect"], "Vs");
    let declaration = &json["statements"][0]["VariableDeclaration"];
    assert_eq!(declaration["name"], "x");
    assert_eq!(declaration["initializer"]["IntegerLiteral"], 1);
    assert_eq!(declaration["location"]["line"], 1);
}
