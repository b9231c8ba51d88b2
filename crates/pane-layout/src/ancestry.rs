// ABOUTME: Bounded upward search through a widget owner chain.
// ABOUTME: Lets hosts find the layout enclosing an arbitrary widget without risking a loop.

/// Maximum number of owner hops [`find_enclosing`] is normally given
pub const MAX_OWNER_DEPTH: usize = 64;

/// Walk from `start` through `parent_of` until `is_target` matches.
///
/// `start` itself is checked first. Gives up after `max_depth` hops, so a
/// cyclic or very deep owner chain still terminates.
pub fn find_enclosing<T, P, M>(start: T, mut parent_of: P, mut is_target: M, max_depth: usize) -> Option<T>
where
    T: Copy,
    P: FnMut(T) -> Option<T>,
    M: FnMut(T) -> bool,
{
    let mut current = start;
    for _ in 0..=max_depth {
        if is_target(current) {
            return Some(current);
        }
        current = parent_of(current)?;
    }
    tracing::warn!("Owner chain deeper than {} hops, giving up", max_depth);
    None
}
