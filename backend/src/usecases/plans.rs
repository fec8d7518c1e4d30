use crates::domain::value_objects::plans::{PLAN_CATALOG, PlanDto};

/// The catalog is static, so this never fails.
pub fn list_plans() -> Vec<PlanDto> {
    PLAN_CATALOG.iter().map(PlanDto::from).collect()
}
