//! Access control: constraints, security contexts and decisions.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::address::{AddressError, AddressTemplate};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecurityError {
    #[error("invalid constraint '{input}'")]
    InvalidConstraint { input: String },
    #[error(transparent)]
    Address(#[from] AddressError),
}

/// What a constraint guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Executable,
    Readable,
    Writable,
}

/// A reference to a guarded operation or attribute of a resource.
///
/// Canonical string form: `executable(<template>:<operation>)` for
/// operations, `readable(<template>@<attribute>)` and
/// `writable(<template>@<attribute>)` for attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    kind: ConstraintKind,
    template: AddressTemplate,
    target: String,
}

impl Constraint {
    pub fn executable(template: AddressTemplate, operation: impl Into<String>) -> Self {
        Self {
            kind: ConstraintKind::Executable,
            template,
            target: operation.into(),
        }
    }

    pub fn readable(template: AddressTemplate, attribute: impl Into<String>) -> Self {
        Self {
            kind: ConstraintKind::Readable,
            template,
            target: attribute.into(),
        }
    }

    pub fn writable(template: AddressTemplate, attribute: impl Into<String>) -> Self {
        Self {
            kind: ConstraintKind::Writable,
            template,
            target: attribute.into(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, SecurityError> {
        let invalid = || SecurityError::InvalidConstraint {
            input: input.to_string(),
        };
        let (kind, rest) = if let Some(rest) = input.strip_prefix("executable(") {
            (ConstraintKind::Executable, rest)
        } else if let Some(rest) = input.strip_prefix("readable(") {
            (ConstraintKind::Readable, rest)
        } else if let Some(rest) = input.strip_prefix("writable(") {
            (ConstraintKind::Writable, rest)
        } else {
            return Err(invalid());
        };
        let inner = rest.strip_suffix(')').ok_or_else(invalid)?;
        let separator = match kind {
            ConstraintKind::Executable => ':',
            ConstraintKind::Readable | ConstraintKind::Writable => '@',
        };
        let (template, target) = inner.rsplit_once(separator).ok_or_else(invalid)?;
        if target.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            kind,
            template: AddressTemplate::parse(template)?,
            target: target.to_string(),
        })
    }

    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    pub fn template(&self) -> &AddressTemplate {
        &self.template
    }

    /// Operation name for executable constraints, attribute name otherwise.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ConstraintKind::Executable => {
                write!(f, "executable({}:{})", self.template, self.target)
            }
            ConstraintKind::Readable => write!(f, "readable({}@{})", self.template, self.target),
            ConstraintKind::Writable => write!(f, "writable({}@{})", self.template, self.target),
        }
    }
}

/// Access control provider of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessControlProvider {
    /// Everything is allowed.
    Simple,
    /// Role based access control, decisions come from the security context.
    Rbac,
}

/// Static information about the server this console manages.
#[derive(Debug, Clone)]
pub struct Environment {
    name: String,
    product_version: String,
    launch: DateTime<Utc>,
    access_control: AccessControlProvider,
    role: Option<String>,
}

impl Environment {
    pub fn new(
        name: impl Into<String>,
        product_version: impl Into<String>,
        access_control: AccessControlProvider,
    ) -> Self {
        Self {
            name: name.into(),
            product_version: product_version.into(),
            launch: Utc::now(),
            access_control,
            role: None,
        }
    }

    /// Names the role the console user acts as. Informational; the
    /// server already answers security context queries for that role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn product_version(&self) -> &str {
        &self.product_version
    }

    pub fn access_control(&self) -> AccessControlProvider {
        self.access_control
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn launch(&self) -> DateTime<Utc> {
        self.launch
    }

    pub fn uptime(&self) -> chrono::Duration {
        Utc::now() - self.launch
    }
}

/// Per resource access rights under RBAC.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecurityContext {
    readable: bool,
    writable: bool,
    executable: BTreeSet<String>,
    readable_attributes: BTreeSet<String>,
    writable_attributes: BTreeSet<String>,
}

impl SecurityContext {
    /// Resource can be read, nothing else.
    pub fn read_only() -> Self {
        Self {
            readable: true,
            ..Self::default()
        }
    }

    /// Resource can be read and written.
    pub fn read_write() -> Self {
        Self {
            readable: true,
            writable: true,
            ..Self::default()
        }
    }

    pub fn allow_operation(mut self, operation: impl Into<String>) -> Self {
        self.executable.insert(operation.into());
        self
    }

    pub fn allow_read_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.readable_attributes.insert(attribute.into());
        self
    }

    pub fn allow_write_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.writable_attributes.insert(attribute.into());
        self
    }

    pub fn is_readable(&self) -> bool {
        self.readable
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn is_executable(&self, operation: &str) -> bool {
        self.executable.contains(operation)
    }

    /// Attribute rights fall back to the resource level right when the
    /// attribute is not listed explicitly.
    pub fn attribute_readable(&self, attribute: &str) -> bool {
        self.readable_attributes.contains(attribute) || self.readable
    }

    pub fn attribute_writable(&self, attribute: &str) -> bool {
        self.writable_attributes.contains(attribute) || self.writable
    }
}

/// Outcome of combining the environment with a resource's security context.
///
/// Decisions are transient: recomputed whenever a widget attaches, its
/// selection changes or its data is replaced, and never stored.
#[derive(Debug, Clone, Copy)]
pub struct AuthorisationDecision<'a> {
    permissive: bool,
    context: &'a SecurityContext,
}

impl<'a> AuthorisationDecision<'a> {
    pub fn from(environment: &Environment, context: &'a SecurityContext) -> Self {
        Self {
            permissive: environment.access_control() == AccessControlProvider::Simple,
            context,
        }
    }

    /// The context must be the one resolved for the constraint's resource,
    /// the template inside the constraint is not consulted here.
    pub fn is_allowed(&self, constraint: &Constraint) -> bool {
        if self.permissive {
            return true;
        }
        match constraint.kind() {
            ConstraintKind::Executable => self.context.is_executable(constraint.target()),
            ConstraintKind::Readable => self.context.attribute_readable(constraint.target()),
            ConstraintKind::Writable => self.context.attribute_writable(constraint.target()),
        }
    }
}

/// UI elements that carry an optional constraint and can be hidden.
pub trait Guarded {
    fn constraint(&self) -> Option<&Constraint>;
    fn set_visible(&mut self, visible: bool);
}

/// Toggles guarded elements according to a decision.
/// Elements without a constraint are left alone.
pub struct ElementGuard;

impl ElementGuard {
    pub fn toggle<'a, G, I>(elements: I, decision: &AuthorisationDecision<'_>)
    where
        G: Guarded + 'a,
        I: IntoIterator<Item = &'a mut G>,
    {
        for element in elements {
            let allowed = element.constraint().map(|c| decision.is_allowed(c));
            if let Some(allowed) = allowed {
                element.set_visible(allowed);
            }
        }
    }
}
