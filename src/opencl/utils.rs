//! Вспомогательные функции для OpenCL

use super::types::*;
use crate::status::BlasStatus;

/// Переводит код возврата OpenCL в статус BLAS
pub fn status_from_cl(code: cl_int) -> BlasStatus {
    match code {
        CL_SUCCESS => BlasStatus::Success,
        CL_DEVICE_NOT_FOUND | CL_DEVICE_NOT_AVAILABLE | CL_INVALID_PLATFORM
        | CL_PLATFORM_NOT_FOUND_KHR => BlasStatus::NotInitialized,
        CL_MEM_OBJECT_ALLOCATION_FAILURE | CL_OUT_OF_RESOURCES | CL_OUT_OF_HOST_MEMORY
        | CL_INVALID_BUFFER_SIZE => BlasStatus::AllocFailed,
        CL_MAP_FAILURE => BlasStatus::MappingError,
        CL_COMPILER_NOT_AVAILABLE | CL_BUILD_PROGRAM_FAILURE => BlasStatus::InternalError,
        CL_INVALID_VALUE => BlasStatus::InvalidValue,
        _ => BlasStatus::ExecutionFailed,
    }
}

/// Обрезает C-строку, полученную из `clGet*Info`, по первому нулю
pub fn info_to_string(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

/// Есть ли на устройстве double.
///
/// Старые устройства без cl_khr_fp64 могут вернуть ошибку на запрос
/// `CL_DEVICE_DOUBLE_FP_CONFIG`, это означает отсутствие поддержки.
pub fn fp64_supported(query: Result<(), BlasStatus>, fp_config: cl_bitfield) -> bool {
    query.is_ok() && fp_config != 0
}
