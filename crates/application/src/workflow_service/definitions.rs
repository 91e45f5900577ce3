use super::*;

impl WorkflowService {
    /// Creates a workflow definition with a fresh identifier.
    pub async fn create_workflow(
        &self,
        actor: &UserIdentity,
        input: SaveWorkflowInput,
    ) -> AppResult<WorkflowDefinition> {
        self.require_workflow_write(actor).await?;

        let workflow = build_definition(Uuid::new_v4().to_string(), input)?;
        self.repository
            .save_workflow(actor.tenant_id(), workflow.clone())
            .await?;
        self.append_saved_event(actor, &workflow, "created").await?;

        Ok(workflow)
    }

    /// Replaces an existing workflow definition.
    pub async fn update_workflow(
        &self,
        actor: &UserIdentity,
        workflow_id: &str,
        input: SaveWorkflowInput,
    ) -> AppResult<WorkflowDefinition> {
        self.require_workflow_write(actor).await?;

        if self
            .repository
            .find_workflow(actor.tenant_id(), workflow_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "workflow '{workflow_id}' does not exist for tenant '{}'",
                actor.tenant_id()
            )));
        }

        let workflow = build_definition(workflow_id.to_owned(), input)?;
        self.repository
            .save_workflow(actor.tenant_id(), workflow.clone())
            .await?;
        self.append_saved_event(actor, &workflow, "updated").await?;

        Ok(workflow)
    }

    /// Lists workflow definitions.
    pub async fn list_workflows(&self, actor: &UserIdentity) -> AppResult<Vec<WorkflowDefinition>> {
        self.authorization_service
            .require_permission(actor, resources::WORKFLOWS, PermissionAction::Read, None)
            .await?;
        self.repository.list_workflows(actor.tenant_id()).await
    }

    /// Validates a raw trigger payload through the registry.
    ///
    /// Always returns the structured validation result; unknown types and
    /// missing fields are findings, not errors.
    #[must_use]
    pub fn validate_trigger(&self, trigger_type: &str, payload: &Value) -> TriggerValidation {
        validate_trigger_payload(trigger_type, payload)
    }

    pub(super) async fn require_workflow_write(&self, actor: &UserIdentity) -> AppResult<()> {
        self.authorization_service
            .require_permission(actor, resources::WORKFLOWS, PermissionAction::Write, None)
            .await
    }

    async fn append_saved_event(
        &self,
        actor: &UserIdentity,
        workflow: &WorkflowDefinition,
        verb: &str,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action: AuditAction::WorkflowSaved,
                resource_type: "workflow_definition".to_owned(),
                resource_id: workflow.id().to_owned(),
                detail: Some(format!(
                    "{verb} workflow '{}' trigger '{}' with {} action(s)",
                    workflow.name(),
                    workflow.trigger().trigger_type().as_str(),
                    workflow.actions().len()
                )),
            })
            .await
    }
}

fn build_definition(workflow_id: String, input: SaveWorkflowInput) -> AppResult<WorkflowDefinition> {
    let outcome = validate_trigger_payload(&input.trigger.trigger_type, &input.trigger.config);
    if !outcome.valid {
        return Err(AppError::Validation(outcome.errors.join("; ")));
    }

    let trigger_type = TriggerType::from_str(&input.trigger.trigger_type)?;
    let config = TriggerConfig::from_payload(trigger_type, &input.trigger.config);
    let trigger = WorkflowTrigger::new(
        input
            .trigger
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        input.trigger.name,
        config,
    );

    WorkflowDefinition::new(WorkflowDefinitionInput {
        id: workflow_id,
        name: input.name,
        description: input.description,
        trigger,
        actions: input.actions,
        is_enabled: input.is_enabled,
    })
}
