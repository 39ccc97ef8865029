//! Path algebra and resource locators.

mod algebra;
mod locator;

pub use algebra::{
    combine, common_path, common_path_all, directory_name, file_name, full_path, is_absolute,
    is_url, is_valid_file_name, normalize, relative_path_that_starts_with, relative_to,
    relative_to_first, starts_with_directory, strip_file_name,
};
pub use locator::PathLocator;
