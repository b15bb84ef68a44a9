//! Default rename-table data.
//!
//! This is data the core consumes, not core logic. The entries
//! below are a representative subset of the well-known public CUDA-runtime
//! to HIP-runtime vocabulary, enough to exercise every conversion type and
//! API family the rest of the crate distinguishes; a production deployment
//! would load a much larger table from the same three-map shape.

use super::{ApiFamily, ConvType, RenameEntry};

/// The two-character prefix that anchors string-literal candidate scanning.
pub const IDENTIFIER_PREFIX: &str = "cu";

pub fn identifiers() -> Vec<(&'static str, RenameEntry)> {
    use ApiFamily::Runtime;
    vec![
        (
            "cudaMalloc",
            RenameEntry::new("hipMalloc", ConvType::Memory, Runtime),
        ),
        (
            "cudaFree",
            RenameEntry::new("hipFree", ConvType::Memory, Runtime),
        ),
        (
            "cudaMemcpy",
            RenameEntry::new("hipMemcpy", ConvType::Memory, Runtime),
        ),
        (
            "cudaMemset",
            RenameEntry::new("hipMemset", ConvType::Memory, Runtime),
        ),
        (
            "cudaMallocManaged",
            RenameEntry::new("hipMallocManaged", ConvType::Memory, Runtime),
        ),
        (
            "cudaDeviceSynchronize",
            RenameEntry::new("hipDeviceSynchronize", ConvType::Device, Runtime),
        ),
        (
            "cudaGetDeviceCount",
            RenameEntry::new("hipGetDeviceCount", ConvType::Device, Runtime),
        ),
        (
            "cudaSetDevice",
            RenameEntry::new("hipSetDevice", ConvType::Device, Runtime),
        ),
        (
            "cudaGetLastError",
            RenameEntry::new("hipGetLastError", ConvType::Error, Runtime),
        ),
        (
            "cudaGetErrorString",
            RenameEntry::new("hipGetErrorString", ConvType::Error, Runtime),
        ),
        (
            "cudaStreamCreate",
            RenameEntry::new("hipStreamCreate", ConvType::Stream, Runtime),
        ),
        (
            "cudaStreamDestroy",
            RenameEntry::new("hipStreamDestroy", ConvType::Stream, Runtime),
        ),
        (
            "cudaStreamSynchronize",
            RenameEntry::new("hipStreamSynchronize", ConvType::Stream, Runtime),
        ),
        (
            "cudaEventCreate",
            RenameEntry::new("hipEventCreate", ConvType::Event, Runtime),
        ),
        (
            "cudaEventRecord",
            RenameEntry::new("hipEventRecord", ConvType::Event, Runtime),
        ),
        (
            "cudaEventElapsedTime",
            RenameEntry::new("hipEventElapsedTime", ConvType::Event, Runtime),
        ),
        (
            "cudaSuccess",
            RenameEntry::new("hipSuccess", ConvType::Error, Runtime),
        ),
        (
            "cudaErrorMemoryAllocation",
            RenameEntry::new("hipErrorMemoryAllocation", ConvType::Error, Runtime),
        ),
        (
            "cudaMemcpyHostToDevice",
            RenameEntry::new("hipMemcpyHostToDevice", ConvType::Numeric, Runtime),
        ),
        (
            "cudaMemcpyDeviceToHost",
            RenameEntry::new("hipMemcpyDeviceToHost", ConvType::Numeric, Runtime),
        ),
        // Built-in thread/block identifiers, reached via the member-access
        // handler in the AST dispatcher, composed as
        // "threadIdx.x" style names at lookup time rather than stored here
        // per-component.
        (
            "threadIdx.x",
            RenameEntry::new("hipThreadIdx_x", ConvType::Kernel, Runtime),
        ),
        (
            "threadIdx.y",
            RenameEntry::new("hipThreadIdx_y", ConvType::Kernel, Runtime),
        ),
        (
            "threadIdx.z",
            RenameEntry::new("hipThreadIdx_z", ConvType::Kernel, Runtime),
        ),
        (
            "blockIdx.x",
            RenameEntry::new("hipBlockIdx_x", ConvType::Kernel, Runtime),
        ),
        (
            "blockIdx.y",
            RenameEntry::new("hipBlockIdx_y", ConvType::Kernel, Runtime),
        ),
        (
            "blockIdx.z",
            RenameEntry::new("hipBlockIdx_z", ConvType::Kernel, Runtime),
        ),
        (
            "blockDim.x",
            RenameEntry::new("hipBlockDim_x", ConvType::Kernel, Runtime),
        ),
        (
            "blockDim.y",
            RenameEntry::new("hipBlockDim_y", ConvType::Kernel, Runtime),
        ),
        (
            "blockDim.z",
            RenameEntry::new("hipBlockDim_z", ConvType::Kernel, Runtime),
        ),
        (
            "gridDim.x",
            RenameEntry::new("hipGridDim_x", ConvType::Kernel, Runtime),
        ),
        // An entry that is recognized but has no DST equivalent, to
        // exercise the unsupported path end-to-end.
        (
            "cudaProfilerStart",
            RenameEntry::unsupported(ConvType::Other, Runtime),
        ),
        (
            "cudaProfilerStop",
            RenameEntry::unsupported(ConvType::Other, Runtime),
        ),
    ]
}

pub fn types() -> Vec<(&'static str, RenameEntry)> {
    use ApiFamily::Runtime;
    vec![
        (
            "cudaError_t",
            RenameEntry::new("hipError_t", ConvType::Type, Runtime),
        ),
        (
            "cudaStream_t",
            RenameEntry::new("hipStream_t", ConvType::Type, Runtime),
        ),
        (
            "cudaEvent_t",
            RenameEntry::new("hipEvent_t", ConvType::Type, Runtime),
        ),
        (
            "cudaDeviceProp",
            RenameEntry::new("hipDeviceProp_t", ConvType::Type, Runtime),
        ),
        (
            "cudaMemcpyKind",
            RenameEntry::new("hipMemcpyKind", ConvType::Type, Runtime),
        ),
        (
            "cudaIpcMemHandle_t",
            RenameEntry::unsupported(ConvType::Type, Runtime),
        ),
    ]
}

pub fn includes() -> Vec<(&'static str, RenameEntry)> {
    use ApiFamily::Runtime;
    vec![
        (
            "cuda_runtime.h",
            RenameEntry::new("hip/hip_runtime.h", ConvType::Include, Runtime),
        ),
        (
            "cuda.h",
            RenameEntry::new("hip/hip_runtime.h", ConvType::Include, ApiFamily::Driver),
        ),
        (
            "cuda_runtime_api.h",
            RenameEntry::new("hip/hip_runtime_api.h", ConvType::Include, Runtime),
        ),
        (
            "cuda_fp16.h",
            RenameEntry::new("hip/hip_fp16.h", ConvType::Include, Runtime),
        ),
        (
            "cublas_v2.h",
            RenameEntry::unsupported(ConvType::Include, ApiFamily::Blas),
        ),
    ]
}

/// The runtime header inserted at offset 0 once any edit is produced
/// (at end-of-source).
pub const RUNTIME_HEADER_INCLUDE: &str = "hip/hip_runtime.h";
