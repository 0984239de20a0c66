/// What a presentation layer may ask the coordinator to do.
///
/// Indices refer to catalog positions; percentages are in `0.0..=100.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Play the track at the index, or the catalog cursor.
    Play(Option<usize>),
    TogglePause,
    Pause,
    Resume,
    Stop,
    Next,
    Previous,
    /// Jump to a percentage of the current track.
    Seek(f64),
    /// Scrub by a number of seconds, positive or negative.
    SeekBy(i64),
    SetVolume(f32),
    ToggleShuffle,
    ToggleRepeat,
    Enqueue(usize),
    ClearQueue,
    /// Stop playback after this many minutes.
    ArmSleepTimer(u64),
    CancelSleepTimer,
}
