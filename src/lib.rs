//! Проверка корректности SYRK на ускорителе против эталона на CPU

pub mod arguments;
pub mod backend;
pub mod flops;
pub mod matrix;
#[cfg(feature = "opencl")]
pub mod opencl;
pub mod scalar;
pub mod status;
pub mod syrk_check;
pub mod utils;

// Реэкспортируем макросы на уровень крейта
#[macro_use]
mod macros {
    /// Макрос для обработки кодов возврата OpenCL, дает `Result<(), BlasStatus>`
    #[macro_export]
    macro_rules! cl_check {
        ($expr:expr) => {{
            #[allow(unused_unsafe)]
            let code = unsafe { $expr };
            if code != $crate::opencl::types::CL_SUCCESS {
                Err($crate::opencl::status_from_cl(code))
            } else {
                Ok(()) as ::std::result::Result<(), $crate::status::BlasStatus>
            }
        }};
    }

    /// Макрос для создания объектов OpenCL.
    ///
    /// Код ошибки передается последним аргументом автоматически.
    #[macro_export]
    macro_rules! cl_create {
        ($func:ident($($arg:expr),*)) => {{
            let mut err: $crate::opencl::types::cl_int = $crate::opencl::types::CL_SUCCESS;
            #[allow(unused_unsafe)]
            let obj = unsafe { $crate::opencl::bindings::$func($($arg,)* &mut err) };
            if obj.is_null() || err != $crate::opencl::types::CL_SUCCESS {
                ::log::error!(concat!("Failed to create OpenCL object: ", stringify!($func), " ({})"), err);
                if err == $crate::opencl::types::CL_SUCCESS {
                    Err($crate::status::BlasStatus::InternalError)
                } else {
                    Err($crate::opencl::status_from_cl(err))
                }
            } else {
                Ok(obj) as ::std::result::Result<_, $crate::status::BlasStatus>
            }
        }};
    }
}

// Реэкспорт основных типов для удобства
pub use arguments::{Arguments, Precision};
pub use backend::{run_on_backend, BackendKind, BlasBackend, HostBackend, SyrkAbi};
pub use matrix::{Fill, Operation};
pub use scalar::Scalar;
pub use status::{BlasStatus, SyrkError, UnitCheckFailure};
pub use syrk_check::{run_syrk_check, run_syrk_check_with_precision, SyrkReport};
