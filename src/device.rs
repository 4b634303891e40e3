mod device;

pub use device::Device;

export![allocator, bake, display, environment, sphere];
