use std::fmt::{Display, Formatter};
use std::str::FromStr;

use ecoplaza_core::AppError;
use serde::{Deserialize, Serialize};

/// Dashboard modules that can be protected by a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    /// Lead management.
    Leads,
    /// Commercial unit inventory.
    Locales,
    /// Sales.
    Ventas,
    /// Payment control and sale dossiers.
    ControlPagos,
    /// Sales commissions.
    Comisiones,
    /// Lead re-engagement campaigns.
    Repulse,
    /// Approval workflows.
    Aprobaciones,
    /// User administration.
    Usuarios,
    /// Project administration.
    Proyectos,
    /// Analytics.
    Insights,
    /// Meetings and transcriptions.
    Reuniones,
    /// System configuration.
    Configuracion,
}

impl Module {
    /// Returns a stable storage value for this module.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leads => "leads",
            Self::Locales => "locales",
            Self::Ventas => "ventas",
            Self::ControlPagos => "control_pagos",
            Self::Comisiones => "comisiones",
            Self::Repulse => "repulse",
            Self::Aprobaciones => "aprobaciones",
            Self::Usuarios => "usuarios",
            Self::Proyectos => "proyectos",
            Self::Insights => "insights",
            Self::Reuniones => "reuniones",
            Self::Configuracion => "configuracion",
        }
    }

    /// Returns all known modules.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Module] = &[
            Module::Leads,
            Module::Locales,
            Module::Ventas,
            Module::ControlPagos,
            Module::Comisiones,
            Module::Repulse,
            Module::Aprobaciones,
            Module::Usuarios,
            Module::Proyectos,
            Module::Insights,
            Module::Reuniones,
            Module::Configuracion,
        ];

        ALL
    }

    /// Returns the actions that form a valid capability with this module.
    #[must_use]
    pub fn actions(&self) -> &'static [Action] {
        use Action::*;

        match self {
            Self::Leads => &[
                Read,
                ReadAll,
                Write,
                Update,
                Delete,
                Assign,
                Export,
                Import,
                BulkActions,
            ],
            Self::Locales => &[
                Read,
                ReadAll,
                Write,
                Delete,
                CambiarEstado,
                Export,
                Admin,
            ],
            Self::Ventas => &[Read, Write, Delete, CambiarPrecio, Approve],
            Self::ControlPagos => &[
                Read,
                Write,
                Verify,
                GenerarConstancias,
                GenerarContratos,
                Expediente,
                ValidacionBancaria,
            ],
            Self::Comisiones => &[Read, ReadAll, Export],
            Self::Repulse => &[Read, Write, Config, Exclude],
            Self::Aprobaciones => &[Read, Approve, Reject, Config],
            Self::Usuarios => &[
                Read,
                Write,
                Delete,
                ChangeRole,
                AssignPermissions,
                ViewAudit,
            ],
            Self::Proyectos => &[Read, Write, Delete, Config],
            Self::Insights => &[Read, Export],
            Self::Reuniones => &[Read, ReadAll, Write, Delete],
            Self::Configuracion => &[Read, Write, Webhooks, Integraciones],
        }
    }
}

impl FromStr for Module {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|module| module.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown module value '{value}'")))
    }
}

/// Operations that a capability grants within a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// View own records (row-level filtered).
    Read,
    /// View every record without ownership filter.
    ReadAll,
    /// Create and edit records.
    Write,
    /// Edit existing records only.
    Update,
    /// Delete records.
    Delete,
    /// Export to spreadsheets or PDF.
    Export,
    /// Import from spreadsheets.
    Import,
    /// Bulk operations.
    BulkActions,
    /// Assign resources to sellers.
    Assign,
    /// Approve sensitive operations.
    Approve,
    /// Reject pending approvals.
    Reject,
    /// Verify records.
    Verify,
    /// Configure module parameters.
    Config,
    /// Full module administration.
    Admin,
    /// Change unit status (traffic light).
    CambiarEstado,
    /// Change a sale price.
    CambiarPrecio,
    /// Generate payment certificates.
    GenerarConstancias,
    /// Generate contracts.
    GenerarContratos,
    /// Open the sale dossier.
    Expediente,
    /// Validate bank vouchers.
    ValidacionBancaria,
    /// Change a user's role.
    ChangeRole,
    /// Grant or revoke capabilities.
    AssignPermissions,
    /// Read the permission audit trail.
    ViewAudit,
    /// Manage webhooks.
    Webhooks,
    /// Manage external integrations.
    Integraciones,
    /// Exclude leads from campaigns.
    Exclude,
}

impl Action {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::ReadAll => "read_all",
            Self::Write => "write",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Export => "export",
            Self::Import => "import",
            Self::BulkActions => "bulk_actions",
            Self::Assign => "assign",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Verify => "verify",
            Self::Config => "config",
            Self::Admin => "admin",
            Self::CambiarEstado => "cambiar_estado",
            Self::CambiarPrecio => "cambiar_precio",
            Self::GenerarConstancias => "generar_constancias",
            Self::GenerarContratos => "generar_contratos",
            Self::Expediente => "expediente",
            Self::ValidacionBancaria => "validacion_bancaria",
            Self::ChangeRole => "change_role",
            Self::AssignPermissions => "assign_permissions",
            Self::ViewAudit => "view_audit",
            Self::Webhooks => "webhooks",
            Self::Integraciones => "integraciones",
            Self::Exclude => "exclude",
        }
    }

    /// Returns all known actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Action] = &[
            Action::Read,
            Action::ReadAll,
            Action::Write,
            Action::Update,
            Action::Delete,
            Action::Export,
            Action::Import,
            Action::BulkActions,
            Action::Assign,
            Action::Approve,
            Action::Reject,
            Action::Verify,
            Action::Config,
            Action::Admin,
            Action::CambiarEstado,
            Action::CambiarPrecio,
            Action::GenerarConstancias,
            Action::GenerarContratos,
            Action::Expediente,
            Action::ValidacionBancaria,
            Action::ChangeRole,
            Action::AssignPermissions,
            Action::ViewAudit,
            Action::Webhooks,
            Action::Integraciones,
            Action::Exclude,
        ];

        ALL
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown action value '{value}'")))
    }
}

/// Atomic permission unit: one action on one module.
///
/// Only pairs listed in [`Module::actions`] can be constructed, so a
/// `Capability` value always refers to a catalogued permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Capability {
    module: Module,
    action: Action,
}

impl Capability {
    /// Creates a capability, rejecting pairs outside the catalog.
    pub fn new(module: Module, action: Action) -> Result<Self, AppError> {
        if !module.actions().contains(&action) {
            return Err(AppError::Validation(format!(
                "action '{}' is not defined for module '{}'",
                action.as_str(),
                module.as_str()
            )));
        }

        Ok(Self { module, action })
    }

    /// Returns the protected module.
    #[must_use]
    pub fn module(&self) -> Module {
        self.module
    }

    /// Returns the granted action.
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Returns every catalogued capability in module order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        Module::all()
            .iter()
            .flat_map(|module| {
                module
                    .actions()
                    .iter()
                    .map(move |action| Self {
                        module: *module,
                        action: *action,
                    })
            })
            .collect()
    }

    /// Parses a `module:action` transport value.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl Display for Capability {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.module.as_str(), self.action.as_str())
    }
}

impl FromStr for Capability {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let Some((module, action)) = value.split_once(':') else {
            return Err(AppError::Validation(format!(
                "capability '{value}' must use the 'module:action' format"
            )));
        };

        Self::new(Module::from_str(module)?, Action::from_str(action)?)
    }
}

impl TryFrom<String> for Capability {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(value.as_str())
    }
}

impl From<Capability> for String {
    fn from(value: Capability) -> Self {
        value.to_string()
    }
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a role is created.
    SecurityRoleCreated,
    /// Emitted when a role is deleted.
    SecurityRoleDeleted,
    /// Emitted when a capability is added to a role.
    SecurityRoleCapabilityGranted,
    /// Emitted when a capability is removed from a role.
    SecurityRoleCapabilityRevoked,
    /// Emitted when a user is moved to a role.
    SecurityUserRoleAssigned,
    /// Emitted when a per-user override is created or replaced.
    SecurityUserOverrideSaved,
    /// Emitted when a per-user override is removed.
    SecurityUserOverrideRemoved,
    /// Emitted when a capability check denies a user.
    SecurityUnauthorizedAccessAttempt,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecurityRoleCreated => "security.role.created",
            Self::SecurityRoleDeleted => "security.role.deleted",
            Self::SecurityRoleCapabilityGranted => "security.role.capability_granted",
            Self::SecurityRoleCapabilityRevoked => "security.role.capability_revoked",
            Self::SecurityUserRoleAssigned => "security.user.role_assigned",
            Self::SecurityUserOverrideSaved => "security.user.override_saved",
            Self::SecurityUserOverrideRemoved => "security.user.override_removed",
            Self::SecurityUnauthorizedAccessAttempt => "security.unauthorized_access_attempt",
        }
    }
}
