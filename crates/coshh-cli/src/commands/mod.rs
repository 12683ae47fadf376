pub mod assess;
pub mod extract;
pub mod inventory;
pub mod tables;

use crate::TaskArgs;
use coshh_core::error::CoshhError;
use coshh_core::tables::KnowledgeBase;
use coshh_core::TaskInput;
use std::path::Path;

/// Built-in tables, or the tables in `dir` when one is given.
pub fn load_knowledge_base(dir: Option<&Path>) -> Result<KnowledgeBase, CoshhError> {
    match dir {
        Some(dir) => KnowledgeBase::load_dir(dir),
        None => KnowledgeBase::builtin(),
    }
}

/// Turn task flags into a task input. Quantity and unit are required.
pub fn task_input(args: &TaskArgs) -> Result<TaskInput, CoshhError> {
    let quantity = args
        .quantity
        .ok_or_else(|| CoshhError::InvalidArgument("--quantity is required".into()))?;
    let unit = args
        .unit
        .clone()
        .ok_or_else(|| CoshhError::InvalidArgument("--unit is required".into()))?;
    let quantity_group = args
        .quantity_group
        .as_deref()
        .map(str::parse)
        .transpose()?;

    Ok(TaskInput {
        procedure: args.procedure.clone(),
        quantity,
        unit,
        frequency: args.frequency.clone(),
        duration: args.duration.clone(),
        quantity_group,
        physical_characteristics: args.physical.parse()?,
        exposure_routes: None,
    })
}
