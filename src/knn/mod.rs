// The classifier itself: distances, neighbor selection and voting

mod distance;
pub use distance::{euclidean_distance, squared_distance};

mod select;
pub use select::{nearest_neighbors, Neighbor};

mod majority;
pub use majority::majority_vote;

mod classify;
pub use classify::{classify, evaluate};
