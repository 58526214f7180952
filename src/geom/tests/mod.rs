mod test_contour_basic;
mod test_interpolation_basic;
mod test_mesh_sanity;
