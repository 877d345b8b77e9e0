//! Shared fixtures for unit tests.

use crate::matrix::F64Matrix;

/// 150 three-class targets: 50 of class 0, then classes 1 and 2 interleaved near their border.
pub(crate) fn three_class_targets() -> Vec<f64> {
    let mut targets = vec![0.0; 50];
    targets.extend(std::iter::repeat_n(1.0, 36));
    targets.push(2.0);
    targets.extend(std::iter::repeat_n(1.0, 10));
    targets.extend([2.0, 2.0, 1.0, 1.0, 2.0, 2.0, 2.0, 1.0, 2.0, 2.0, 2.0, 1.0]);
    targets.extend(std::iter::repeat_n(2.0, 41));
    targets
}

/// Weight 10 for class 2, 1 otherwise.
pub(crate) fn class_two_heavy(targets: &[f64]) -> Vec<f64> {
    targets.iter().map(|&t| if t == 2.0 { 10.0 } else { 1.0 }).collect()
}

/// Aptitude test score, previous experience in months, pass.
const APTITUDE: [[f64; 3]; 26] = [
    [5.0, 6.0, 0.0],
    [1.0, 15.0, 0.0],
    [1.0, 12.0, 0.0],
    [4.0, 6.0, 0.0],
    [1.0, 15.0, 1.0],
    [1.0, 6.0, 0.0],
    [4.0, 16.0, 1.0],
    [1.0, 10.0, 1.0],
    [3.0, 12.0, 0.0],
    [4.0, 26.0, 1.0],
    [5.0, 2.0, 1.0],
    [1.0, 12.0, 0.0],
    [3.0, 18.0, 0.0],
    [3.0, 3.0, 0.0],
    [1.0, 24.0, 1.0],
    [2.0, 8.0, 0.0],
    [1.0, 9.0, 0.0],
    [4.0, 18.0, 0.0],
    [4.0, 22.0, 1.0],
    [5.0, 3.0, 1.0],
    [4.0, 12.0, 0.0],
    [4.0, 24.0, 1.0],
    [2.0, 18.0, 1.0],
    [2.0, 6.0, 0.0],
    [1.0, 8.0, 0.0],
    [5.0, 12.0, 0.0],
];

/// The 26-row aptitude dataset: two features and a binary pass target.
pub(crate) fn aptitude() -> (F64Matrix, Vec<f64>) {
    let data: Vec<f64> = APTITUDE.iter().flat_map(|r| [r[0], r[1]]).collect();
    let targets = APTITUDE.iter().map(|r| r[2]).collect();
    (F64Matrix::new(APTITUDE.len(), 2, data).unwrap(), targets)
}

/// Stable sort of one aptitude column, returning the sorted values and the targets carried along.
pub(crate) fn aptitude_sorted_by(col: usize) -> (Vec<f64>, Vec<f64>) {
    let (matrix, targets) = aptitude();
    let mut order: Vec<usize> = (0..matrix.rows()).collect();
    order.sort_by(|&a, &b| matrix.at(a, col).total_cmp(&matrix.at(b, col)));
    let feature = order.iter().map(|&i| matrix.at(i, col)).collect();
    let sorted_targets = order.iter().map(|&i| targets[i]).collect();
    (feature, sorted_targets)
}
