use log::error;
use std::ffi::{c_char, c_void, CStr};

/// Тип callback-функции для контекста OpenCL
pub type ContextNotifyCallback = Option<
    unsafe extern "C" fn(
        errinfo: *const c_char,
        private_info: *const c_void,
        cb: usize,
        user_data: *mut c_void,
    )
>;

/// Пишет в лог асинхронные ошибки контекста
pub unsafe extern "C" fn context_error_callback(
    errinfo: *const c_char,
    _private_info: *const c_void,
    _cb: usize,
    _user_data: *mut c_void,
) {
    if errinfo.is_null() {
        error!("OpenCL context error");
        return;
    }
    let message = unsafe { CStr::from_ptr(errinfo) };
    error!("OpenCL context error: {}", message.to_string_lossy());
}
