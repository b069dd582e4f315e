use redditembed_core::Submission;

/// Structural category of a submission's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentShape {
    SelfPost,
    Poll,
    Link,
    Image,
    Video,
    Gallery,
}

impl ContentShape {
    pub fn classify(submission: &Submission) -> Self {
        if submission.is_self {
            if submission.poll_data.is_some() {
                return ContentShape::Poll;
            }
            return ContentShape::SelfPost;
        }
        match submission.post_hint.as_deref() {
            Some("image") => ContentShape::Image,
            Some("hosted:video") => ContentShape::Video,
            _ if submission.is_gallery == Some(true) => ContentShape::Gallery,
            _ => ContentShape::Link,
        }
    }

    /// Self-like shapes carry their own body text instead of an external link.
    pub fn is_self_like(self) -> bool {
        matches!(self, ContentShape::SelfPost | ContentShape::Poll)
    }
}

/// A submission paired with the shape it was classified as.
///
/// The shape is computed once on construction so every renderer in a request
/// agrees on it.
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedSubmission<'a> {
    submission: &'a Submission,
    shape: ContentShape,
}

impl<'a> ClassifiedSubmission<'a> {
    pub fn new(submission: &'a Submission) -> Self {
        Self {
            submission,
            shape: ContentShape::classify(submission),
        }
    }

    pub fn submission(&self) -> &'a Submission {
        self.submission
    }

    pub fn shape(&self) -> ContentShape {
        self.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{poll_submission, submission};
    use redditembed_core::PollData;

    #[test]
    fn test_self_post_with_poll_is_poll() {
        let post = poll_submission(chrono::Utc::now(), vec![("a", Some(1))]);
        assert_eq!(ContentShape::classify(&post), ContentShape::Poll);
    }

    #[test]
    fn test_plain_self_post() {
        let mut post = submission();
        post.is_self = true;
        assert_eq!(ContentShape::classify(&post), ContentShape::SelfPost);
    }

    #[test]
    fn test_post_hints() {
        let mut post = submission();
        post.post_hint = Some("image".to_string());
        assert_eq!(ContentShape::classify(&post), ContentShape::Image);

        post.post_hint = Some("hosted:video".to_string());
        assert_eq!(ContentShape::classify(&post), ContentShape::Video);

        post.post_hint = Some("rich:video".to_string());
        assert_eq!(ContentShape::classify(&post), ContentShape::Link);
    }

    #[test]
    fn test_gallery_requires_true_flag() {
        let mut post = submission();
        post.is_gallery = Some(false);
        assert_eq!(ContentShape::classify(&post), ContentShape::Link);

        post.is_gallery = Some(true);
        assert_eq!(ContentShape::classify(&post), ContentShape::Gallery);
    }

    #[test]
    fn test_hints_ignored_on_self_posts() {
        let mut post = submission();
        post.is_self = true;
        post.post_hint = Some("image".to_string());
        post.is_gallery = Some(true);
        assert_eq!(ContentShape::classify(&post), ContentShape::SelfPost);
    }

    #[test]
    fn test_poll_data_ignored_on_link_posts() {
        let mut post = submission();
        post.poll_data = Some(PollData {
            total_vote_count: 0,
            voting_end: chrono::Utc::now(),
            options: Vec::new(),
        });
        assert_eq!(ContentShape::classify(&post), ContentShape::Link);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let mut post = submission();
        post.post_hint = Some("hosted:video".to_string());
        let first = ClassifiedSubmission::new(&post);
        let second = ClassifiedSubmission::new(&post);
        assert_eq!(first.shape(), second.shape());
        assert_eq!(first.shape(), ContentShape::classify(first.submission()));
    }

    #[test]
    fn test_self_like() {
        assert!(ContentShape::SelfPost.is_self_like());
        assert!(ContentShape::Poll.is_self_like());
        for shape in [
            ContentShape::Link,
            ContentShape::Image,
            ContentShape::Video,
            ContentShape::Gallery,
        ] {
            assert!(!shape.is_self_like());
        }
    }
}
