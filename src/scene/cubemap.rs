/// Corners of the unit cube, front square (z = +1) then back square (z = -1).
///
/// Each square is ordered top right, bottom right, bottom left, top left.
pub const CUBE_CORNERS: [[f32; 3]; 8] = [
    [1.0, 1.0, 1.0],
    [1.0, -1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, -1.0],
    [1.0, -1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [-1.0, 1.0, -1.0],
];

/// Four corners per face, matched to the screen quad vertex order.
pub const FACE_CORNER_INDICES: [usize; 24] = [
    5, 4, 0, 1, // right
    2, 3, 7, 6, // left
    0, 4, 7, 3, // top
    5, 1, 2, 6, // bottom
    1, 0, 3, 2, // back
    6, 7, 4, 5, // front
];

/// Cube map face in upload order, starting at `TEXTURE_CUBE_MAP_POSITIVE_X`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CubeFace {
    Right,
    Left,
    Top,
    Bottom,
    Back,
    Front,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Right,
        CubeFace::Left,
        CubeFace::Top,
        CubeFace::Bottom,
        CubeFace::Back,
        CubeFace::Front,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn corner_indices(self) -> &'static [usize] {
        &FACE_CORNER_INDICES[4 * self.index()..4 * self.index() + 4]
    }

    pub fn corner_directions(self) -> [[f32; 3]; 4] {
        let indices = self.corner_indices();

        [
            CUBE_CORNERS[indices[0]],
            CUBE_CORNERS[indices[1]],
            CUBE_CORNERS[indices[2]],
            CUBE_CORNERS[indices[3]],
        ]
    }
}

/// Face resolutions of a prefiltered cube map, one entry per mip level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MipChain {
    resolutions: Vec<usize>,
}

impl MipChain {
    /// Halves the base resolution for every level after the first.
    ///
    /// Levels which would end up with a zero resolution are dropped.
    pub fn new(base: usize, levels: usize) -> Self {
        let mut resolutions = Vec::with_capacity(levels);
        let mut resolution = base;

        while resolutions.len() < levels && resolution > 0 {
            resolutions.push(resolution);
            resolution /= 2;
        }

        Self { resolutions }
    }

    pub fn len(&self) -> usize {
        self.resolutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolutions.is_empty()
    }

    pub fn resolution(&self, level: usize) -> usize {
        self.resolutions[level]
    }

    pub fn base_resolution(&self) -> usize {
        self.resolutions.first().copied().unwrap_or(0)
    }

    pub fn max_level(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// Iterates over `(level, resolution)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.resolutions.iter().copied().enumerate()
    }

    /// Glossiness of a level, from 1 at the base down to 0 at the last level.
    pub fn specular_exponent(&self, level: usize) -> f32 {
        if self.len() <= 1 {
            return 1.0;
        }

        1.0 - level as f32 / self.max_level() as f32
    }

    /// Phong lobe power used to prefilter a level.
    pub fn specular_power(&self, level: usize) -> f32 {
        2.0f32.powf(15.0 * self.specular_exponent(level))
    }
}
