//! Ускоритель на OpenCL

use super::BlasBackend;
use crate::matrix::{syrk_args_valid, syrk_kernel_source, Fill, Operation, SYRK_KERNEL_NAME};
use crate::opencl::bindings::*;
use crate::opencl::callbacks::context_error_callback;
use crate::opencl::types::*;
use crate::opencl::utils::{fp64_supported, info_to_string};
use crate::scalar::Scalar;
use crate::status::BlasStatus;
use crate::{cl_check, cl_create};
use log::{debug, error, info};
use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{c_void, CString};
use std::marker::PhantomData;
use std::mem::size_of;
use std::ptr;

/// Буфер в памяти устройства. Пустой буфер не владеет `cl_mem`.
pub struct ClBuffer<T> {
    mem: cl_mem,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T> ClBuffer<T> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn bytes(&self) -> usize {
        self.len * size_of::<T>()
    }
}

impl<T> Drop for ClBuffer<T> {
    fn drop(&mut self) {
        if !self.mem.is_null() {
            unsafe {
                clReleaseMemObject(self.mem);
            }
        }
    }
}

struct CompiledKernel {
    program: cl_program,
    kernel: cl_kernel,
}

/// Контекст, очередь и собранные ядра на одном устройстве
pub struct OpenClBackend {
    context: cl_context,
    command_queue: cl_command_queue,
    device: cl_device_id,
    device_name: String,
    supports_fp64: bool,
    kernels: RefCell<HashMap<&'static str, CompiledKernel>>,
}

impl OpenClBackend {
    /// Берет первое GPU устройство, при его отсутствии любое доступное
    pub fn new() -> Result<Self, BlasStatus> {
        let device = find_device()?;

        let mut name = vec![0u8; 256];
        cl_check!(clGetDeviceInfo(
            device,
            CL_DEVICE_NAME,
            name.len(),
            name.as_mut_ptr() as *mut c_void,
            ptr::null_mut()
        ))?;
        let device_name = info_to_string(&name);

        let mut fp_config: cl_bitfield = 0;
        let fp_query = cl_check!(clGetDeviceInfo(
            device,
            CL_DEVICE_DOUBLE_FP_CONFIG,
            size_of::<cl_bitfield>(),
            &mut fp_config as *mut _ as *mut c_void,
            ptr::null_mut()
        ));
        if let Err(status) = fp_query {
            debug!("CL_DEVICE_DOUBLE_FP_CONFIG недоступен ({}), double отключён", status);
        }
        let supports_fp64 = fp64_supported(fp_query, fp_config);

        let context = cl_create!(clCreateContext(
            ptr::null(),
            1,
            &device,
            Some(context_error_callback),
            ptr::null_mut()
        ))?;

        // Дальше ресурсы освобождает Drop
        let mut backend = Self {
            context,
            command_queue: ptr::null_mut(),
            device,
            device_name,
            supports_fp64,
            kernels: RefCell::new(HashMap::new()),
        };
        backend.command_queue = cl_create!(clCreateCommandQueue(context, device, 0))?;

        info!(
            "OpenCL устройство: {} (fp64: {})",
            backend.device_name,
            if backend.supports_fp64 { "да" } else { "нет" }
        );
        Ok(backend)
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Ядро SYRK для типа `T`, собирается при первом обращении
    fn syrk_kernel<T: Scalar>(&self) -> Result<cl_kernel, BlasStatus> {
        if let Some(compiled) = self.kernels.borrow().get(T::CL_TYPE) {
            return Ok(compiled.kernel);
        }

        debug!("Компиляция ядра SYRK для {}", T::CL_TYPE);
        let source = syrk_kernel_source::<T>();
        let source_ptr = source.as_ptr() as *const std::ffi::c_char;
        let source_len = source.len();
        let program = cl_create!(clCreateProgramWithSource(
            self.context,
            1,
            &source_ptr,
            &source_len
        ))?;

        let build = cl_check!(clBuildProgram(
            program,
            1,
            &self.device,
            ptr::null(),
            None,
            ptr::null_mut()
        ));
        if let Err(status) = build {
            error!("Ошибка при компиляции программы:\n{}", self.build_log(program));
            unsafe {
                clReleaseProgram(program);
            }
            return Err(status);
        }

        let name = CString::new(SYRK_KERNEL_NAME).map_err(|_| BlasStatus::InternalError)?;
        let kernel = match cl_create!(clCreateKernel(program, name.as_ptr())) {
            Ok(kernel) => kernel,
            Err(status) => {
                unsafe {
                    clReleaseProgram(program);
                }
                return Err(status);
            }
        };

        self.kernels
            .borrow_mut()
            .insert(T::CL_TYPE, CompiledKernel { program, kernel });
        Ok(kernel)
    }

    fn build_log(&self, program: cl_program) -> String {
        let mut log_size: usize = 0;
        unsafe {
            clGetProgramBuildInfo(
                program,
                self.device,
                CL_PROGRAM_BUILD_LOG,
                0,
                ptr::null_mut(),
                &mut log_size,
            );
        }
        let mut build_log = vec![0u8; log_size];
        unsafe {
            clGetProgramBuildInfo(
                program,
                self.device,
                CL_PROGRAM_BUILD_LOG,
                log_size,
                build_log.as_mut_ptr() as *mut c_void,
                ptr::null_mut(),
            );
        }
        info_to_string(&build_log)
    }
}

impl Drop for OpenClBackend {
    fn drop(&mut self) {
        debug!("Освобождение ресурсов OpenCL");
        unsafe {
            for (_, compiled) in self.kernels.get_mut().drain() {
                clReleaseKernel(compiled.kernel);
                clReleaseProgram(compiled.program);
            }
            if !self.command_queue.is_null() {
                clReleaseCommandQueue(self.command_queue);
            }
            clReleaseContext(self.context);
        }
    }
}

fn find_device() -> Result<cl_device_id, BlasStatus> {
    let mut num_platforms: cl_uint = 0;
    cl_check!(clGetPlatformIDs(0, ptr::null_mut(), &mut num_platforms))?;
    if num_platforms == 0 {
        return Err(BlasStatus::NotInitialized);
    }
    let mut platforms = vec![ptr::null_mut(); num_platforms as usize];
    cl_check!(clGetPlatformIDs(num_platforms, platforms.as_mut_ptr(), ptr::null_mut()))?;

    for device_type in [CL_DEVICE_TYPE_GPU, CL_DEVICE_TYPE_ALL] {
        for &platform in &platforms {
            let mut device: cl_device_id = ptr::null_mut();
            let mut num_devices: cl_uint = 0;
            let found = cl_check!(clGetDeviceIDs(platform, device_type, 1, &mut device, &mut num_devices));
            if found.is_ok() && num_devices > 0 {
                debug!("Платформа OpenCL: {}", platform_name(platform));
                return Ok(device);
            }
        }
    }
    Err(BlasStatus::NotInitialized)
}

fn platform_name(platform: cl_platform_id) -> String {
    let mut name = vec![0u8; 256];
    let status = cl_check!(clGetPlatformInfo(
        platform,
        CL_PLATFORM_NAME,
        name.len(),
        name.as_mut_ptr() as *mut c_void,
        ptr::null_mut()
    ));
    match status {
        Ok(()) => info_to_string(&name),
        Err(_) => String::from("<unknown>"),
    }
}

fn set_arg<V>(kernel: cl_kernel, index: cl_uint, value: &V) -> Result<(), BlasStatus> {
    cl_check!(clSetKernelArg(
        kernel,
        index,
        size_of::<V>(),
        value as *const V as *const c_void
    ))
}

impl BlasBackend for OpenClBackend {
    type Buffer<T: Scalar> = ClBuffer<T>;

    fn name(&self) -> &str {
        "opencl"
    }

    fn alloc<T: Scalar>(&self, len: usize) -> Result<ClBuffer<T>, BlasStatus> {
        if len == 0 {
            return Ok(ClBuffer {
                mem: ptr::null_mut(),
                len,
                _marker: PhantomData,
            });
        }
        let mem = cl_create!(clCreateBuffer(
            self.context,
            CL_MEM_READ_WRITE,
            len * size_of::<T>(),
            ptr::null_mut()
        ))?;
        Ok(ClBuffer {
            mem,
            len,
            _marker: PhantomData,
        })
    }

    fn upload<T: Scalar>(&self, dst: &mut ClBuffer<T>, src: &[T]) -> Result<(), BlasStatus> {
        if dst.len != src.len() {
            return Err(BlasStatus::InvalidValue);
        }
        if dst.is_empty() {
            return Ok(());
        }
        cl_check!(clEnqueueWriteBuffer(
            self.command_queue,
            dst.mem,
            CL_TRUE,
            0,
            dst.bytes(),
            src.as_ptr() as *const c_void,
            0,
            ptr::null(),
            ptr::null_mut()
        ))
    }

    fn download<T: Scalar>(&self, src: &ClBuffer<T>, dst: &mut [T]) -> Result<(), BlasStatus> {
        if src.len != dst.len() {
            return Err(BlasStatus::InvalidValue);
        }
        if src.is_empty() {
            return Ok(());
        }
        cl_check!(clEnqueueReadBuffer(
            self.command_queue,
            src.mem,
            CL_TRUE,
            0,
            src.bytes(),
            dst.as_mut_ptr() as *mut c_void,
            0,
            ptr::null(),
            ptr::null_mut()
        ))
    }

    fn syrk<T: Scalar>(
        &self,
        uplo: Fill,
        trans: Operation,
        n: i32,
        k: i32,
        alpha: &T,
        a: &ClBuffer<T>,
        lda: i32,
        beta: &T,
        c: &mut ClBuffer<T>,
        ldc: i32,
    ) -> Result<(), BlasStatus> {
        if !syrk_args_valid(trans, n, k, lda, ldc) {
            return Err(BlasStatus::InvalidValue);
        }
        if T::CL_TYPE == "double" && !self.supports_fp64 {
            return Err(BlasStatus::NotSupported);
        }
        let (zero, one) = (T::zero(), T::one());
        if n == 0 || ((*alpha == zero || k == 0) && *beta == one) {
            return Ok(());
        }
        if c.len < (ldc as usize) * (n as usize) {
            return Err(BlasStatus::InvalidValue);
        }

        let kernel = self.syrk_kernel::<T>()?;
        let upper: i32 = (uplo == Fill::Upper) as i32;
        let transposed: i32 = trans.is_transposed() as i32;

        set_arg(kernel, 0, &a.mem)?;
        set_arg(kernel, 1, &c.mem)?;
        set_arg(kernel, 2, &n)?;
        set_arg(kernel, 3, &k)?;
        set_arg(kernel, 4, &lda)?;
        set_arg(kernel, 5, &ldc)?;
        set_arg(kernel, 6, alpha)?;
        set_arg(kernel, 7, beta)?;
        set_arg(kernel, 8, &upper)?;
        set_arg(kernel, 9, &transposed)?;

        let global_size = [n as usize, n as usize];
        cl_check!(clEnqueueNDRangeKernel(
            self.command_queue,
            kernel,
            2,
            ptr::null(),
            global_size.as_ptr(),
            ptr::null(),
            0,
            ptr::null(),
            ptr::null_mut()
        ))?;
        cl_check!(clFinish(self.command_queue))
    }
}
