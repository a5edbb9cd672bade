use std::sync::Arc;

use ecoplaza_core::{AppResult, UserIdentity};
use ecoplaza_domain::{Action, AuditAction, Capability, Module};

use crate::security_admin_ports::SecurityAdminRepository;
use crate::{AuditEvent, AuditRepository, AuthorizationService};

mod overrides;
mod roles;


/// Application service for role and override administration.
///
/// Every write is gated on the actor's capability, drops the affected cache
/// scope once the repository accepts it, and is then audited.
#[derive(Clone)]
pub struct SecurityAdminService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn SecurityAdminRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl SecurityAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn SecurityAdminRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            audit_repository,
        }
    }

    async fn require_usuarios(&self, actor: &UserIdentity, action: Action) -> AppResult<()> {
        let capability = Capability::new(Module::Usuarios, action)?;
        self.authorization_service
            .require_capability(actor, capability)
            .await
    }

    async fn append_audit(
        &self,
        actor: &UserIdentity,
        action: AuditAction,
        resource_type: &str,
        resource_id: String,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action,
                resource_type: resource_type.to_owned(),
                resource_id,
                detail: Some(detail),
            })
            .await
    }
}
