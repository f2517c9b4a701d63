pub mod device;
pub mod employee;
pub mod model;
pub mod repair;

pub use device::{
    Device, DeviceAssignmentFlag, DeviceDetail, DeviceEmployeeAssignment, IssuedDevice, UsedDevice,
};
pub use employee::{Employee, EmployeeRef, EmployeeUpdate, EmployeeWithAddress};
pub use model::{EmployeeDeviceCount, Model, ModelAllocation};
pub use repair::{RepairDetail, RepairSummary, ServiceProvider};
