/// Property-based roundtrip tests.
///
/// Uses `proptest` to generate node trees and verify that
/// `decode(encode(tree)) == tree` holds, for quoted documents with escape codes and
/// for bare documents with whitespace-free tokens.
///
/// Leaves are built as `parse_all(text)`, the value a parser would produce for
/// `text`, so the property also covers re-reading every rendered scalar.
///
/// Excluded from generation:
/// - empty groups (the writer elides them, so they cannot come back)
/// - text the cascade reads as a non-finite float (`nan` is never equal to itself)
use proptest::prelude::*;
use vkv_core::{
    decode_named, encode, escape, from_str, parse_all, unescape, Node, Primitive, Scalar,
    TreeNode, VkvOptions,
};

// ============================================================================
// Strategies
// ============================================================================

/// Lowercase words, keeping only those the cascade leaves as text or booleans.
fn arb_word() -> impl Strategy<Value = String> {
    "[a-z]{2,10}".prop_filter("word must stay a word", |word| {
        matches!(parse_all(word), Scalar::String(_) | Scalar::Bool(_))
    })
}

fn arb_integer_text() -> impl Strategy<Value = String> {
    any::<i64>().prop_map(|n| n.to_string())
}

fn arb_decimal_text() -> impl Strategy<Value = String> {
    "-?[0-9]{1,4}\\.[0-9]{1,3}"
}

/// Text with characters only quoting and escape codes can carry.
fn arb_free_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 \"\\\\\t\n']{0,16}".prop_filter("text must not read as NaN", |text| !is_nan(&parse_all(text)))
}

fn is_nan(scalar: &Scalar) -> bool {
    match scalar {
        Scalar::F16(v) => v.is_nan(),
        Scalar::F32(v) => v.is_nan(),
        Scalar::F64(v) => v.is_nan(),
        _ => false,
    }
}

fn arb_bare_leaf() -> impl Strategy<Value = Node> {
    prop_oneof![arb_word(), arb_integer_text(), arb_decimal_text()]
        .prop_map(|text| Node::single(parse_all(&text)))
}

fn arb_quoted_leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        arb_word(),
        arb_integer_text(),
        arb_decimal_text(),
        arb_free_text(),
    ]
    .prop_map(|text| Node::single(parse_all(&text)))
}

fn arb_bare_key() -> impl Strategy<Value = String> + Clone {
    "[a-zA-Z_][a-zA-Z0-9_]{0,10}"
}

fn arb_quoted_key() -> impl Strategy<Value = String> + Clone {
    "[a-zA-Z0-9_ \"\\\\]{1,12}"
}

/// Trees of depth up to 3 with 1 to 4 children per group.
fn arb_tree<K, L>(key: K, leaf: L) -> impl Strategy<Value = Node>
where
    K: Strategy<Value = String> + Clone + 'static,
    L: Strategy<Value = Node> + 'static,
{
    leaf.prop_recursive(3, 24, 4, move |inner| {
        prop::collection::vec((key.clone(), inner), 1..5)
            .prop_map(|entries| Node::Tree(entries.into_iter().collect::<TreeNode>()))
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Core roundtrip property with quotes and escape codes on.
    #[test]
    fn quoted_roundtrip_preserves_tree(node in arb_tree(arb_quoted_key(), arb_quoted_leaf())) {
        let options = VkvOptions::quoted();
        let text = encode(Some(&node), "root", &options);
        let decoded = decode_named(&text, &options).unwrap();
        prop_assert_eq!(
            decoded,
            Some(("root".to_string(), node)),
            "Roundtrip failed!\n  VKV:\n{}",
            text
        );
    }

    /// Same property for bare documents.
    #[test]
    fn bare_roundtrip_preserves_tree(node in arb_tree(arb_bare_key(), arb_bare_leaf())) {
        let options = VkvOptions::default();
        let text = encode(Some(&node), "root", &options);
        let decoded = decode_named(&text, &options).unwrap();
        prop_assert_eq!(decoded, Some(("root".to_string(), node)), "VKV:\n{}", text);
    }

    /// Escaping then unescaping gives back the input byte for byte.
    #[test]
    fn escape_roundtrip(text in any::<String>()) {
        prop_assert_eq!(unescape(&escape(&text)), text);
    }

    /// Every 64-bit integer survives the cascade, including 0 and 1 read as booleans.
    #[test]
    fn integers_survive_the_cascade(n in any::<i64>()) {
        let scalar = parse_all(&n.to_string());
        prop_assert!(!matches!(scalar, Scalar::String(_)));
        prop_assert_eq!(i64::from_scalar(&scalar).unwrap(), n);
    }

    /// A list whose keys leave the `0..n` sequence never decodes.
    #[test]
    fn list_with_gap_is_rejected(len in 2usize..8, skip in 0usize..8) {
        let skip = skip % len;
        let tree: TreeNode = (0..len)
            .map(|index| {
                let key = if index == skip { len } else { index };
                (key.to_string(), Node::single(format!("v{index}")))
            })
            .collect();
        let text = encode(Some(&Node::Tree(tree)), "list", &VkvOptions::default());
        prop_assert!(from_str::<Vec<String>>(&text, &VkvOptions::default()).is_err());
    }
}
