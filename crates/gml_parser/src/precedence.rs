//! The operator table: precedence, associativity and class of every
//! operator the binary-expression machinery knows about.

/// How operators of equal precedence group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorClass {
    Unary,
    Arithmetic,
    Bitwise,
    Comparison,
    Logical,
    Assignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorInfo {
    /// Higher binds tighter. Zero is reserved for non-operator operands.
    pub precedence: u8,
    pub associativity: Associativity,
    pub class: OperatorClass,
}

const fn op(precedence: u8, associativity: Associativity, class: OperatorClass) -> OperatorInfo {
    OperatorInfo {
        precedence,
        associativity,
        class,
    }
}

use Associativity::{Left, Right};
use OperatorClass::*;

/// Every operator keyed by its source text. Word operators (`and`, `div`)
/// sit at the same level as their symbolic twins.
pub const OPERATOR_TABLE: [(&str, OperatorInfo); 31] = [
    ("++", op(15, Right, Unary)),
    ("--", op(15, Right, Unary)),
    ("~", op(14, Right, Unary)),
    ("!", op(14, Right, Unary)),
    ("*", op(13, Left, Arithmetic)),
    ("/", op(13, Left, Arithmetic)),
    ("div", op(13, Left, Arithmetic)),
    ("%", op(13, Left, Arithmetic)),
    ("mod", op(13, Left, Arithmetic)),
    ("+", op(12, Left, Arithmetic)),
    ("-", op(12, Left, Arithmetic)),
    ("<<", op(11, Left, Bitwise)),
    (">>", op(11, Left, Bitwise)),
    ("&", op(10, Left, Bitwise)),
    ("^", op(9, Left, Bitwise)),
    ("|", op(8, Left, Bitwise)),
    ("<", op(7, Left, Comparison)),
    ("<=", op(7, Left, Comparison)),
    (">", op(7, Left, Comparison)),
    (">=", op(7, Left, Comparison)),
    ("==", op(6, Left, Comparison)),
    ("!=", op(6, Left, Comparison)),
    ("<>", op(6, Left, Comparison)),
    ("&&", op(5, Left, Logical)),
    ("and", op(5, Left, Logical)),
    ("^^", op(4, Left, Logical)),
    ("xor", op(4, Left, Logical)),
    ("||", op(3, Left, Logical)),
    ("or", op(3, Left, Logical)),
    ("??", op(2, Right, Logical)),
    ("=", op(1, Right, Assignment)),
];

/// Look up an operator by its source text.
pub fn operator_info(operator: &str) -> Option<OperatorInfo> {
    OPERATOR_TABLE
        .iter()
        .find(|(text, _)| *text == operator)
        .map(|(_, info)| *info)
}

/// Look up an operator that may join two operands in an expression.
pub fn binary_operator_info(operator: &str) -> Option<OperatorInfo> {
    operator_info(operator).filter(|info| !matches!(info.class, Unary | Assignment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_operators_match_symbols() {
        assert_eq!(operator_info("and"), operator_info("&&"));
        assert_eq!(operator_info("or"), operator_info("||"));
        assert_eq!(operator_info("xor"), operator_info("^^"));
        assert_eq!(operator_info("mod"), operator_info("%"));
        assert_eq!(operator_info("<>"), operator_info("!="));
    }

    #[test]
    fn test_precedence_ordering() {
        let prec = |op: &str| operator_info(op).unwrap().precedence;
        assert!(prec("*") > prec("+"));
        assert!(prec("+") > prec("<<"));
        assert!(prec("<<") > prec("&"));
        assert!(prec("&") > prec("^"));
        assert!(prec("^") > prec("|"));
        assert!(prec("|") > prec("<"));
        assert!(prec("<") > prec("=="));
        assert!(prec("==") > prec("&&"));
        assert!(prec("&&") > prec("^^"));
        assert!(prec("^^") > prec("||"));
        assert!(prec("||") > prec("??"));
        assert!(prec("??") > prec("="));
    }

    #[test]
    fn test_binary_lookup_excludes_unary_and_assignment() {
        assert!(binary_operator_info("!").is_none());
        assert!(binary_operator_info("=").is_none());
        assert_eq!(binary_operator_info("??").unwrap().associativity, Associativity::Right);
        assert!(binary_operator_info("+=").is_none());
    }

    #[test]
    fn test_no_zero_precedence_entries() {
        assert!(OPERATOR_TABLE.iter().all(|(_, info)| info.precedence > 0));
    }
}
