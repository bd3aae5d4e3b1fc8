//! State-gated mutation rules.
//!
//! Pure decisions over device snapshots; persisting the outcome is up to the caller.

use common::domain::{Device, DeviceFields, DomainError, DomainResult, OperationType};

/// Outcome of a permitted update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateDecision {
    /// The proposal equals the current record; nothing to persist
    Unchanged(Device),
    /// The merged record to persist
    Apply(Device),
}

impl UpdateDecision {
    pub fn into_device(self) -> Device {
        match self {
            UpdateDecision::Unchanged(device) | UpdateDecision::Apply(device) => device,
        }
    }
}

/// Decide whether `current` may take the `proposed` fields.
///
/// Name and brand of an `IN_USE` device are frozen; its state may still change.
/// `id` and `created_at` always come from `current`.
pub fn evaluate_update(current: &Device, proposed: &DeviceFields) -> DomainResult<UpdateDecision> {
    let proposed = proposed.trimmed();

    if proposed == current.fields() {
        return Ok(UpdateDecision::Unchanged(current.clone()));
    }

    if current.is_in_use() && (proposed.name != current.name || proposed.brand != current.brand) {
        return Err(DomainError::DeviceInUse {
            id: current.id,
            operation: OperationType::Update,
        });
    }

    Ok(UpdateDecision::Apply(Device {
        id: current.id,
        name: proposed.name,
        brand: proposed.brand,
        state: proposed.state,
        created_at: current.created_at,
    }))
}

/// An `IN_USE` device may not be deleted
pub fn evaluate_delete(current: &Device) -> DomainResult<()> {
    if current.is_in_use() {
        return Err(DomainError::DeviceInUse {
            id: current.id,
            operation: OperationType::Delete,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::domain::DeviceState;

    fn device(state: DeviceState) -> Device {
        Device {
            id: 1,
            name: "iPhone 15 Pro".to_string(),
            brand: "Apple".to_string(),
            state,
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    fn fields(name: &str, brand: &str, state: DeviceState) -> DeviceFields {
        DeviceFields {
            name: name.to_string(),
            brand: brand.to_string(),
            state,
        }
    }

    #[test]
    fn test_identical_proposal_is_unchanged() {
        let current = device(DeviceState::InUse);
        let decision =
            evaluate_update(&current, &fields("iPhone 15 Pro", "Apple", DeviceState::InUse))
                .unwrap();
        assert_eq!(decision, UpdateDecision::Unchanged(current));
    }

    #[test]
    fn test_proposal_equal_after_trimming_is_unchanged() {
        let current = device(DeviceState::Available);
        let decision = evaluate_update(
            &current,
            &fields("  iPhone 15 Pro ", " Apple", DeviceState::Available),
        )
        .unwrap();
        assert!(matches!(decision, UpdateDecision::Unchanged(_)));
    }

    #[test]
    fn test_in_use_rejects_name_change() {
        let current = device(DeviceState::InUse);
        let result = evaluate_update(&current, &fields("Different", "Apple", DeviceState::InUse));
        assert!(matches!(
            result,
            Err(DomainError::DeviceInUse {
                id: 1,
                operation: OperationType::Update
            })
        ));
    }

    #[test]
    fn test_in_use_rejects_brand_change_even_when_releasing() {
        let current = device(DeviceState::InUse);
        let result = evaluate_update(
            &current,
            &fields("iPhone 15 Pro", "Samsung", DeviceState::Available),
        );
        assert!(matches!(result, Err(DomainError::DeviceInUse { .. })));
    }

    #[test]
    fn test_in_use_allows_state_change() {
        let current = device(DeviceState::InUse);
        let decision = evaluate_update(
            &current,
            &fields("iPhone 15 Pro", "Apple", DeviceState::Available),
        )
        .unwrap();

        match decision {
            UpdateDecision::Apply(updated) => {
                assert_eq!(updated.state, DeviceState::Available);
                assert_eq!(updated.id, current.id);
                assert_eq!(updated.created_at, current.created_at);
            }
            other => panic!("Expected Apply, got {:?}", other),
        }
    }

    #[test]
    fn test_available_allows_any_change() {
        let current = device(DeviceState::Available);
        let decision = evaluate_update(
            &current,
            &fields(" Galaxy S24 ", "Samsung", DeviceState::InUse),
        )
        .unwrap();

        let updated = decision.into_device();
        assert_eq!(updated.name, "Galaxy S24");
        assert_eq!(updated.brand, "Samsung");
        assert_eq!(updated.state, DeviceState::InUse);
        assert_eq!(updated.created_at, current.created_at);
    }

    #[test]
    fn test_in_use_rejects_invalid_name_before_any_length_rule() {
        let current = device(DeviceState::InUse);
        let result = evaluate_update(&current, &fields("X", "Apple", DeviceState::InUse));
        assert!(matches!(
            result,
            Err(DomainError::DeviceInUse {
                operation: OperationType::Update,
                ..
            })
        ));
    }

    #[test]
    fn test_delete_rules() {
        assert!(evaluate_delete(&device(DeviceState::Available)).is_ok());
        assert!(evaluate_delete(&device(DeviceState::Inactive)).is_ok());
        assert!(matches!(
            evaluate_delete(&device(DeviceState::InUse)),
            Err(DomainError::DeviceInUse {
                operation: OperationType::Delete,
                ..
            })
        ));
    }
}
