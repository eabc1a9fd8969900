//! Prefix rules deciding which bucket claims a declaration.
//!
//! A rule matches when the selected subject string starts with
//! `lead + stem`, where the stem is either the bucket name or the bucket name
//! with a trailing `Server` removed. Only the RPC scaffolding rules use the
//! stripped stem; the plain name, type and receiver rules do not.

use crate::core::{DeclKind, Declaration};

/// Which declaration string a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Name,
    DeclaredType,
    Receiver,
}

/// Which form of the bucket name a rule appends to its lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stem {
    /// The bucket name as declared.
    Bucket,
    /// The bucket name without a trailing `Server`.
    Service,
}

#[derive(Debug, PartialEq, Eq)]
pub struct PrefixRule {
    pub id: &'static str,
    pub kinds: &'static [DeclKind],
    pub subject: Subject,
    pub lead: &'static str,
    pub stem: Stem,
}

const VALUES: &[DeclKind] = &[DeclKind::Var, DeclKind::Const];
const VALUES_AND_FUNCS: &[DeclKind] = &[DeclKind::Var, DeclKind::Const, DeclKind::Func];
const FUNCS: &[DeclKind] = &[DeclKind::Func];
const NAMED: &[DeclKind] = &[DeclKind::Type, DeclKind::Var, DeclKind::Const];

pub const RULES: &[PrefixRule] = &[
    PrefixRule {
        id: "name",
        kinds: NAMED,
        subject: Subject::Name,
        lead: "",
        stem: Stem::Bucket,
    },
    PrefixRule {
        id: "declared-type",
        kinds: VALUES,
        subject: Subject::DeclaredType,
        lead: "",
        stem: Stem::Bucket,
    },
    PrefixRule {
        id: "message-info",
        kinds: VALUES,
        subject: Subject::Name,
        lead: "xxx_messageInfo_",
        stem: Stem::Bucket,
    },
    PrefixRule {
        id: "filter",
        kinds: VALUES,
        subject: Subject::Name,
        lead: "filter_",
        stem: Stem::Service,
    },
    PrefixRule {
        id: "receiver",
        kinds: FUNCS,
        subject: Subject::Receiver,
        lead: "",
        stem: Stem::Bucket,
    },
    PrefixRule {
        id: "constructor",
        kinds: FUNCS,
        subject: Subject::Name,
        lead: "New",
        stem: Stem::Bucket,
    },
    PrefixRule {
        id: "register",
        kinds: FUNCS,
        subject: Subject::Name,
        lead: "Register",
        stem: Stem::Service,
    },
    PrefixRule {
        id: "request",
        kinds: FUNCS,
        subject: Subject::Name,
        lead: "request_",
        stem: Stem::Service,
    },
    PrefixRule {
        id: "local-request",
        kinds: FUNCS,
        subject: Subject::Name,
        lead: "local_request_",
        stem: Stem::Service,
    },
    PrefixRule {
        id: "underscore",
        kinds: VALUES_AND_FUNCS,
        subject: Subject::Name,
        lead: "_",
        stem: Stem::Service,
    },
];

/// Remove a trailing `Server` from a bucket name.
pub fn strip_server(name: &str) -> &str {
    name.strip_suffix("Server").unwrap_or(name)
}

/// A bucket name prepared for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketKey<'a> {
    pub name: &'a str,
    pub service: &'a str,
}

impl<'a> BucketKey<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            service: strip_server(name),
        }
    }

    fn stem(&self, stem: Stem) -> &'a str {
        match stem {
            Stem::Bucket => self.name,
            Stem::Service => self.service,
        }
    }
}

impl PrefixRule {
    pub fn applies_to(&self, kind: DeclKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn matches(&self, decl: &Declaration, key: &BucketKey<'_>) -> bool {
        if !self.applies_to(decl.kind) {
            return false;
        }
        let subject = match self.subject {
            Subject::Name => decl.name.as_str(),
            Subject::DeclaredType => decl.declared_type.as_str(),
            Subject::Receiver => decl.receiver_type.as_str(),
        };
        subject
            .strip_prefix(self.lead)
            .is_some_and(|rest| rest.starts_with(key.stem(self.stem)))
    }
}

/// First rule under which `key` claims `decl`.
pub fn matching_rule(decl: &Declaration, key: &BucketKey<'_>) -> Option<&'static PrefixRule> {
    RULES.iter().find(|rule| rule.matches(decl, key))
}
