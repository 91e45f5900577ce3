use super::*;

impl WorkflowService {
    /// Matches a runtime event against the tenant's enabled workflows.
    ///
    /// Each match is recorded in the audit trail; execution of the matched
    /// actions is handed off elsewhere. Returns how many workflows matched.
    /// No permission check happens here because dispatch runs inside
    /// operations that have already authorized their own mutation.
    pub async fn dispatch_event(
        &self,
        actor: &UserIdentity,
        event: &TriggerEvent,
    ) -> AppResult<usize> {
        let workflows = self
            .repository
            .list_enabled_workflows(actor.tenant_id())
            .await?;

        let mut matched = 0;
        for workflow in workflows {
            if !workflow.fires_on(event) {
                continue;
            }

            self.audit_repository
                .append_event(AuditEvent {
                    tenant_id: actor.tenant_id(),
                    subject: actor.subject().to_owned(),
                    action: AuditAction::WorkflowTriggerMatched,
                    resource_type: "workflow_definition".to_owned(),
                    resource_id: workflow.id().to_owned(),
                    detail: Some(format!(
                        "trigger '{}' matched {} event for client '{}'",
                        workflow.trigger().name(),
                        event.kind(),
                        event.client_id()
                    )),
                })
                .await?;
            matched += 1;
        }

        Ok(matched)
    }
}
