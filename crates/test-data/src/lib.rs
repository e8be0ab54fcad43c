pub struct TestModel {
    pub bytes: &'static [u8],
    pub triangle_count: usize,
    pub point_count: usize,
}

pub const STL_CUBE: TestModel = TestModel {
    bytes: include_bytes!("../../../res/cube/cube-bin.stl"),
    triangle_count: 12,
    point_count: 8,
};

pub const STL_CUBE_ASCII: TestModel = TestModel {
    bytes: include_bytes!("../../../res/cube/cube-ascii.stl"),
    triangle_count: 12,
    point_count: 8,
};

/// A single facet: normal (0,0,1) over (0,0,0), (1,0,0), (0,1,0) with an all-zero header.
pub const STL_TRIANGLE: TestModel = TestModel {
    bytes: include_bytes!("../../../res/triangle/triangle-bin.stl"),
    triangle_count: 1,
    point_count: 3,
};
