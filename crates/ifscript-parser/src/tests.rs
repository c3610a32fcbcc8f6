use super::*;

fn text_of(tree: &ForkTree, id: NodeId) -> &str {
    &tree.node(id).text
}

#[test]
fn entry_with_no_if_becomes_root_text() {
    let parsed = Parser::parse_str("@start\nhello there\n").unwrap();
    let tree = &parsed.forks["start"];
    assert!(tree.node(tree.root).condition.is_empty());
    assert_eq!(tree.node(tree.root).text, "hello there");
    assert!(tree.node(tree.root).children.is_empty());
}

#[test]
fn preorder_concatenation_reconstructs_entry() {
    let src = "@start\nbefore\nif x > 1\nmiddle\nendif\nafter\n";
    let parsed = Parser::parse_str(src).unwrap();
    let tree = &parsed.forks["start"];
    let order = tree.preorder();
    let reconstructed: String = order
        .iter()
        .map(|&id| text_of(tree, id))
        .collect::<Vec<_>>()
        .join("");
    assert_eq!(reconstructed, "before\nmiddle\nafter");
}

#[test]
fn nested_if_produces_nested_children() {
    let src = "@start\nif a\nif b\ninner\nendif\nendif\n";
    let parsed = Parser::parse_str(src).unwrap();
    let tree = &parsed.forks["start"];
    let root = tree.node(tree.root);
    assert_eq!(root.children.len(), 1);
    let outer = tree.node(root.children[0]);
    assert_eq!(outer.condition, "if a");
    assert_eq!(outer.children.len(), 1);
    let inner = tree.node(outer.children[0]);
    assert_eq!(inner.condition, "if b");
    assert_eq!(inner.children.len(), 1);
    assert_eq!(text_of(tree, inner.children[0]), "inner\n");
}

#[test]
fn unbalanced_if_without_endif_is_fatal() {
    let src = "@start\nif a\nnever closed\n";
    let err = Parser::parse_str(src).unwrap_err();
    assert!(matches!(err, ParseError::UnbalancedIf { .. }));
}

#[test]
fn stray_endif_is_fatal() {
    let src = "@start\nendif\n";
    let err = Parser::parse_str(src).unwrap_err();
    assert!(matches!(err, ParseError::UnbalancedIf { .. }));
}

#[test]
fn duplicate_fork_name_is_fatal() {
    let src = "@start\na\n@start\nb\n";
    let err = Parser::parse_str(src).unwrap_err();
    assert_eq!(err, ParseError::DuplicateFork("start".to_string()));
}

#[test]
fn empty_fork_name_is_fatal() {
    let src = "@\nbody\n";
    let err = Parser::parse_str(src).unwrap_err();
    assert_eq!(err, ParseError::EmptyForkName);
}

#[test]
fn fork_names_normalize_case_and_whitespace() {
    let src = "@ Start \nhi\n";
    let parsed = Parser::parse_str(src).unwrap();
    assert!(parsed.forks.contains_key("start"));
}

#[test]
fn header_lines_precede_first_fork() {
    let src = "title: Example\ncolor: fff\n@start\nhi\n";
    let parsed = Parser::parse_str(src).unwrap();
    assert_eq!(parsed.header, "title: Example\ncolor: fff");
    assert_eq!(parsed.first_fork(), Some("start"));
}

#[test]
fn comments_are_stripped_before_if_scanning() {
    let src = "@start\n// if a\nplain\n";
    let parsed = Parser::parse_str(src).unwrap();
    let tree = &parsed.forks["start"];
    assert!(tree.node(tree.root).children.is_empty());
    assert_eq!(tree.node(tree.root).text, "\nplain");
}

#[test]
fn option_line_if_is_not_treated_as_conditional() {
    let src = "@start\nGo north@north\n";
    let parsed = Parser::parse_str(src).unwrap();
    let tree = &parsed.forks["start"];
    assert!(tree.node(tree.root).children.is_empty());
    assert_eq!(tree.node(tree.root).text, "Go north@north");
}

#[test]
fn file_not_found_is_reported() {
    let err = Parser::parse_file(std::path::Path::new("/no/such/file.txt")).unwrap_err();
    assert!(matches!(err, ParseError::FileNotFound(_)));
}
