use crate::runtime::scheduler::SchedulerCommand;

#[derive(Debug, Clone)]
pub enum Effect {
    Schedule(SchedulerCommand),
    RequestRender,
}
