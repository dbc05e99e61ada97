//! Parse tree and term types for unit expressions.

/// Classification of a matched unit symbol.
///
/// Drives whether an SI symbol code may be derived for a term: only the metric
/// classes are eligible, and any conventional term in an expression suppresses
/// symbol codes for the whole expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnitClass {
    /// A base-unit symbol that accepts an SI prefix (`m`, `g`, `Pa`).
    Metric,
    /// Treated as metric but never prefixed (`min`, `h`, `Cel`).
    NonMetricMetric,
    Conventional,
    /// A `[...]` spelling such as `[ft_i]`.
    ConventionalBracketed,
    /// A spelling with an embedded bracket such as `m[Hg]`.
    ConventionalMixedBracketed,
    /// A bare integer factor.
    Factor,
}

impl UnitClass {
    pub fn is_metric(self) -> bool {
        matches!(self, UnitClass::Metric | UnitClass::NonMetricMetric)
    }

    pub fn is_conventional(self) -> bool {
        matches!(
            self,
            UnitClass::Conventional
                | UnitClass::ConventionalBracketed
                | UnitClass::ConventionalMixedBracketed
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    /// `.`
    Multiply,
    /// `/`
    Divide,
}

/// `simple_unit`: an optional prefix followed by a unit symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleUnit {
    pub prefix: Option<&'static str>,
    pub symbol: &'static str,
    pub class: UnitClass,
}

/// `component`: an annotatable unit with optional exponent, or a bare factor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Component {
    Unit {
        unit: SimpleUnit,
        exponent: Option<i32>,
    },
    Factor(u64),
}

/// `term`: left-recursive chain of components joined by operators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TermNode {
    Component(Component),
    Operation {
        lhs: Box<TermNode>,
        op: Operator,
        rhs: Component,
    },
}

/// `start`: the whole expression, remembering whether it began with `/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseTree {
    pub source: String,
    pub leading_slash: bool,
    pub term: TermNode,
}

/// One multiplicative or divisive factor of a parsed expression.
///
/// Field order matters: the derived `Ord` is the tie-break used when two terms
/// share the same case-folded UCUM code.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UnitTerm {
    /// Empty when the term carries no prefix.
    pub prefix: String,
    pub base_unit: String,
    pub class: UnitClass,
    pub exponent: i32,
}

impl UnitTerm {
    pub fn new(
        prefix: impl Into<String>,
        base_unit: impl Into<String>,
        class: UnitClass,
        exponent: i32,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            base_unit: base_unit.into(),
            class,
            exponent,
        }
    }

    /// `prefix + base_unit`
    pub fn ucum_code(&self) -> String {
        format!("{}{}", self.prefix, self.base_unit)
    }

    pub fn is_denominator(&self) -> bool {
        self.exponent < 0
    }

    /// Appends the exponent to `code`, eliding it when it is exactly `1`.
    pub fn with_exponent(&self, code: &str) -> String {
        if self.exponent == 1 {
            code.to_string()
        } else {
            format!("{}{}", code, self.exponent)
        }
    }
}

/// Intermediate result of each parse-tree reduction: a single term or a
/// sequence of nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Term(UnitTerm),
    Sequence(Vec<Node>),
}

impl Node {
    /// Flattens nested sequences into source order.
    pub fn flatten(self) -> Vec<UnitTerm> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Node::Term(term) => out.push(term),
                Node::Sequence(nodes) => stack.extend(nodes.into_iter().rev()),
            }
        }
        out
    }
}
