mod scene;

pub use scene::Scene;

export![camera, controls, cubemap, dirty, environment, raster, sphere, viewer];
