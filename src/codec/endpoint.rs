use std::collections::HashSet;

use crate::error::{SwitchError, SwitchResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointBinding {
    pub name: String,
    pub id: u8,
}

/// Bijective mapping between physical endpoint ids and endpoint names
#[derive(Debug, Clone)]
pub struct EndpointResolver {
    bindings: Vec<EndpointBinding>,
}

impl EndpointResolver {
    pub const BUTTON_PREFIX: &'static str = "button";

    pub fn new(bindings: Vec<EndpointBinding>) -> SwitchResult<Self> {
        let mut names = HashSet::new();
        let mut ids = HashSet::new();

        for bind in &bindings {
            if !names.insert(bind.name.as_str()) {
                return Err(SwitchError::DuplicateEndpoint(bind.name.clone()));
            }
            if !ids.insert(bind.id) {
                return Err(SwitchError::DuplicateEndpoint(bind.id.to_string()));
            }
        }

        Ok(Self { bindings })
    }

    /// `count` buttons named `button_1 .. button_<count>`, on consecutive
    /// endpoints starting at `first`.
    pub fn sequential(first: u8, count: u8) -> SwitchResult<Self> {
        let invalid = SwitchError::InvalidEndpointLayout { first, count };

        if count == 0 || first == 0 {
            return Err(invalid);
        }
        first.checked_add(count - 1).ok_or(invalid)?;

        let bindings = (0..count)
            .map(|offset| EndpointBinding {
                name: format!("{}_{}", Self::BUTTON_PREFIX, offset + 1),
                id: first + offset,
            })
            .collect();

        Self::new(bindings)
    }

    pub fn to_semantic_name(&self, id: u8) -> SwitchResult<&str> {
        self.bindings
            .iter()
            .find(|bind| bind.id == id)
            .map(|bind| bind.name.as_str())
            .ok_or(SwitchError::UnknownEndpoint(id))
    }

    pub fn to_physical_id(&self, name: &str) -> SwitchResult<u8> {
        self.bindings
            .iter()
            .find(|bind| bind.name == name)
            .map(|bind| bind.id)
            .ok_or_else(|| SwitchError::UnknownEndpointName(name.to_string()))
    }

    #[must_use]
    pub fn bindings(&self) -> &[EndpointBinding] {
        &self.bindings
    }
}

#[cfg(test)]
mod tests {
    use crate::codec::endpoint::{EndpointBinding, EndpointResolver};
    use crate::error::SwitchError;

    #[test]
    fn single_button() {
        let res = EndpointResolver::sequential(2, 1).unwrap();
        assert_eq!(res.to_semantic_name(2).unwrap(), "button_1");
        assert_eq!(res.to_physical_id("button_1").unwrap(), 2);
        assert!(matches!(
            res.to_semantic_name(1).unwrap_err(),
            SwitchError::UnknownEndpoint(1)
        ));
        assert!(matches!(
            res.to_physical_id("button_2").unwrap_err(),
            SwitchError::UnknownEndpointName(_)
        ));
    }

    #[test]
    fn bijective_for_many_buttons() {
        let res = EndpointResolver::sequential(2, 4).unwrap();
        assert_eq!(res.bindings().len(), 4);

        for bind in res.bindings() {
            assert_eq!(res.to_physical_id(&bind.name).unwrap(), bind.id);
            assert_eq!(res.to_semantic_name(bind.id).unwrap(), bind.name);
        }
        assert_eq!(res.to_semantic_name(5).unwrap(), "button_4");
    }

    #[test]
    fn invalid_layouts() {
        assert!(matches!(
            EndpointResolver::sequential(2, 0).unwrap_err(),
            SwitchError::InvalidEndpointLayout { first: 2, count: 0 }
        ));
        assert!(EndpointResolver::sequential(0, 1).is_err());
        assert!(EndpointResolver::sequential(250, 7).is_err());
        assert!(EndpointResolver::sequential(250, 6).is_ok());
    }

    #[test]
    fn duplicates_rejected() {
        let res = EndpointResolver::new(vec![
            EndpointBinding {
                name: "left".into(),
                id: 2,
            },
            EndpointBinding {
                name: "right".into(),
                id: 2,
            },
        ]);
        assert!(matches!(res.unwrap_err(), SwitchError::DuplicateEndpoint(_)));
    }
}
