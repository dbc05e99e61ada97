//! Statements and the de-duplicated, insertion-ordered graph that holds them.

use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Object {
    Iri(String),
    Literal { value: String, lang: Option<String> },
}

impl Object {
    pub fn iri(iri: impl Into<String>) -> Self {
        Object::Iri(iri.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Object::Literal {
            value: value.into(),
            lang: None,
        }
    }

    pub fn lang_literal(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Object::Literal {
            value: value.into(),
            lang: Some(lang.into()),
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Object::Iri(iri) => Some(iri),
            Object::Literal { .. } => None,
        }
    }
}

/// `(subject, predicate, object)` with subject and predicate as full IRIs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Statement {
    pub subject: String,
    pub predicate: String,
    pub object: Object,
}

impl Statement {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Object) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }
}

/// A set of statements that remembers first-insertion order.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    statements: Vec<Statement>,
    seen: HashSet<Statement>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `statement`; returns `false` if it was already present.
    pub fn insert(&mut self, statement: Statement) -> bool {
        if self.seen.contains(&statement) {
            return false;
        }
        self.seen.insert(statement.clone());
        self.statements.push(statement);
        true
    }

    pub fn extend<I: IntoIterator<Item = Statement>>(&mut self, statements: I) {
        for statement in statements {
            self.insert(statement);
        }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn contains(&self, statement: &Statement) -> bool {
        self.seen.contains(statement)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    /// Statements grouped by subject, subjects in first-appearance order.
    pub fn by_subject(&self) -> Vec<(&str, Vec<&Statement>)> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(&str, Vec<&Statement>)> = Vec::new();
        for statement in &self.statements {
            let slot = *index.entry(statement.subject.as_str()).or_insert_with(|| {
                groups.push((statement.subject.as_str(), Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(statement);
        }
        groups
    }

    /// Objects of every `(subject, predicate, _)` statement.
    pub fn objects<'a>(
        &'a self,
        subject: &'a str,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Object> + 'a {
        self.statements
            .iter()
            .filter(move |s| s.subject == subject && s.predicate == predicate)
            .map(|s| &s.object)
    }
}

impl IntoIterator for Graph {
    type Item = Statement;
    type IntoIter = std::vec::IntoIter<Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}
