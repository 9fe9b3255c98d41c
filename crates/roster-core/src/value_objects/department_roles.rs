//! Department → Discord role mapping
//!
//! Static configuration loaded once at startup. Every department maps to exactly
//! one role and no two departments share a role.

use crate::entities::Department;
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// One-to-one mapping from departments to Discord role ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartmentRoleMap {
    technical: Snowflake,
    design: Snowflake,
    marketing: Snowflake,
    management: Snowflake,
}

impl DepartmentRoleMap {
    /// Build the mapping, rejecting unset or shared role ids
    pub fn new(
        technical: Snowflake,
        design: Snowflake,
        marketing: Snowflake,
        management: Snowflake,
    ) -> Result<Self, DomainError> {
        let map = Self {
            technical,
            design,
            marketing,
            management,
        };

        for (i, (department, role)) in map.iter().enumerate() {
            if role.is_zero() {
                return Err(DomainError::ValidationError(format!(
                    "role id for {department} is not set"
                )));
            }
            if let Some((other, _)) = map.iter().skip(i + 1).find(|(_, r)| *r == role) {
                return Err(DomainError::ValidationError(format!(
                    "{department} and {other} are mapped to the same role {role}"
                )));
            }
        }

        Ok(map)
    }

    /// Role a member of `department` should hold
    pub fn role_for(&self, department: Department) -> Snowflake {
        match department {
            Department::Technical => self.technical,
            Department::Design => self.design,
            Department::Marketing => self.marketing,
            Department::Management => self.management,
        }
    }

    /// Department whose role is `role_id`, if any
    pub fn department_for(&self, role_id: Snowflake) -> Option<Department> {
        self.iter().find(|(_, r)| *r == role_id).map(|(d, _)| d)
    }

    /// Whether `role_id` is one of the department roles
    pub fn is_department_role(&self, role_id: Snowflake) -> bool {
        self.department_for(role_id).is_some()
    }

    /// Iterate over `(department, role)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (Department, Snowflake)> + '_ {
        Department::ALL.into_iter().map(|d| (d, self.role_for(d)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DepartmentRoleMap {
        DepartmentRoleMap::new(
            Snowflake::new(1_292_540_786_759_700_623),
            Snowflake::new(1_292_540_869_433_491_466),
            Snowflake::new(1_292_540_932_054_585_384),
            Snowflake::new(1_292_540_937_653_715_088),
        )
        .unwrap()
    }

    #[test]
    fn test_role_for_each_department() {
        let map = sample();
        assert_eq!(
            map.role_for(Department::Design),
            Snowflake::new(1_292_540_869_433_491_466)
        );
        assert_eq!(map.iter().count(), 4);
    }

    #[test]
    fn test_department_for_role() {
        let map = sample();
        assert_eq!(
            map.department_for(Snowflake::new(1_292_540_786_759_700_623)),
            Some(Department::Technical)
        );
        assert!(!map.is_department_role(Snowflake::new(42)));
    }

    #[test]
    fn test_rejects_unset_role() {
        let err = DepartmentRoleMap::new(
            Snowflake::new(1),
            Snowflake::default(),
            Snowflake::new(3),
            Snowflake::new(4),
        )
        .unwrap_err();
        assert!(err.to_string().contains("DESIGN"));
    }

    #[test]
    fn test_rejects_shared_role() {
        let err = DepartmentRoleMap::new(
            Snowflake::new(1),
            Snowflake::new(2),
            Snowflake::new(2),
            Snowflake::new(4),
        )
        .unwrap_err();
        assert!(err.to_string().contains("DESIGN and MARKETING"));
    }
}
