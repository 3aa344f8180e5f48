//! Pure metric functions over a [`Video`]. Nothing here decides thresholds
//! or rankings — that's [`crate::filter`], [`crate::scoring`], and
//! [`crate::gate`]'s job. Ported from `services/metrics.py`.

use crate::video::Video;
use chrono::Utc;

/// Default age (hours) assumed when `publish_time` is absent.
///
/// The original Python used 24h in the filter and 48h in the scorer; §9's
/// open question asks for one consistent default. We pick 24h everywhere —
/// lenient towards videos with unknown publish time rather than penalizing
/// them in scoring, matching the filter's existing behavior. See
/// DESIGN.md.
pub const DEFAULT_HOURS_SINCE_PUBLISH: f64 = 24.0;

/// Hours elapsed since publish, floored at `0.1` to keep downstream
/// divisions well-defined. Defaults to [`DEFAULT_HOURS_SINCE_PUBLISH`] when
/// `publish_time` is unknown.
pub fn hours_since_publish(video: &Video) -> f64 {
    match video.publish_time {
        Some(t) => {
            let hours = (Utc::now() - t).num_milliseconds() as f64 / 3_600_000.0;
            hours.max(0.1)
        }
        None => DEFAULT_HOURS_SINCE_PUBLISH,
    }
}

/// Weighted engagement rate: comments and shares count for more than a
/// bare like, since they represent a stronger signal of active interest.
pub fn engagement_rate(video: &Video) -> f64 {
    let views = video.views.max(1) as f64;
    let weighted = video.likes as f64 + video.comments as f64 * 2.0 + video.shares as f64 * 3.0;
    weighted / views
}

/// Views accrued per hour since publish.
pub fn views_per_hour(video: &Video) -> f64 {
    video.views as f64 / hours_since_publish(video)
}

/// Ratio of comments to likes — a proxy for "people are talking about
/// this" independent of raw popularity.
pub fn discussion_score(video: &Video) -> f64 {
    let likes = video.likes.max(1) as f64;
    video.comments as f64 / likes
}

/// Log-scaled creator reach: the gap between 1k and 10k followers matters
/// more than the gap between 1M and 2M.
pub fn author_power(video: &Video) -> f64 {
    (video.author_followers as f64 + 1.0).log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::Platform;
    use chrono::Duration;

    fn video() -> Video {
        Video::new(Platform::TikTok, "1", "https://tiktok.com/@a/video/1")
    }

    #[test]
    fn missing_publish_time_defaults_consistently() {
        let v = video();
        assert_eq!(hours_since_publish(&v), DEFAULT_HOURS_SINCE_PUBLISH);
    }

    #[test]
    fn hours_since_publish_floors_at_point_one() {
        let mut v = video();
        v.publish_time = Some(Utc::now());
        assert_eq!(hours_since_publish(&v), 0.1);
    }

    #[test]
    fn engagement_rate_weights_shares_highest() {
        let mut v = video();
        v.views = 1000;
        v.likes = 100;
        v.comments = 0;
        v.shares = 0;
        let likes_only = engagement_rate(&v);
        v.likes = 0;
        v.shares = 34; // 34*3 ~= 100*1 in weighted terms, roughly comparable
        let shares_only = engagement_rate(&v);
        assert!(shares_only > 0.0 && likes_only > 0.0);
    }

    #[test]
    fn views_per_hour_divides_by_elapsed_hours() {
        let mut v = video();
        v.views = 3600;
        v.publish_time = Some(Utc::now() - Duration::hours(1));
        let vph = views_per_hour(&v);
        assert!((vph - 3600.0).abs() < 50.0);
    }

    #[test]
    fn discussion_score_safe_when_no_likes() {
        let mut v = video();
        v.comments = 10;
        v.likes = 0;
        assert_eq!(discussion_score(&v), 10.0);
    }

    #[test]
    fn author_power_is_zero_for_no_followers() {
        let v = video();
        assert_eq!(author_power(&v), 0.0);
    }
}
