pub mod stdx;

#[cfg(test)]
mod test_utils;
