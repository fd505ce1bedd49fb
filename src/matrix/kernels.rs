//! OpenCL ядра для матричных операций

use crate::scalar::Scalar;

/// Имя ядра SYRK в программе
pub const SYRK_KERNEL_NAME: &str = "syrk";

/// Шаблон ядра SYRK, `@T@` заменяется на тип элемента.
///
/// Один work-item на элемент C. Матрицы хранятся по столбцам.
/// Сжатие в fma выключено: каждое умножение и сложение округляется
/// отдельно, как в эталоне на CPU.
pub static SYRK_KERNEL_TEMPLATE: &str = r#"
@PRAGMA@
#pragma OPENCL FP_CONTRACT OFF

__kernel void syrk(
    __global const @T@* a,
    __global @T@* c,
    const int n,
    const int k,
    const int lda,
    const int ldc,
    const @T@ alpha,
    const @T@ beta,
    const int upper,
    const int trans
) {
    const int i = get_global_id(0);
    const int j = get_global_id(1);

    if (i >= n || j >= n) {
        return;
    }
    // Только выбранный треугольник
    if (upper ? (i > j) : (i < j)) {
        return;
    }

    // При alpha == 0 матрица A не читается
    @T@ sum = (@T@)0;
    if (alpha != (@T@)0) {
        for (int p = 0; p < k; p++) {
            const @T@ ai = trans ? a[p + i * lda] : a[i + p * lda];
            const @T@ aj = trans ? a[p + j * lda] : a[j + p * lda];
            sum += ai * aj;
        }
    }

    const int idx = i + j * ldc;
    if (beta == (@T@)0) {
        c[idx] = alpha * sum;
    } else {
        c[idx] = alpha * sum + beta * c[idx];
    }
}
"#;

/// Исходник ядра SYRK для конкретного типа элемента
pub fn syrk_kernel_source<T: Scalar>() -> String {
    let pragma = if T::CL_TYPE == "double" {
        "#pragma OPENCL EXTENSION cl_khr_fp64 : enable"
    } else {
        ""
    };
    SYRK_KERNEL_TEMPLATE
        .replace("@PRAGMA@", pragma)
        .replace("@T@", T::CL_TYPE)
}
