use crate::commands::{
    clamp_content, command_definitions, info_text, nsfw_allowed, url_argument,
    INVALID_URL_MESSAGE, NSFW_REFUSAL_MESSAGE, REDDIT_COMMAND, REDDIT_INFO_COMMAND,
    VIDEO_PLACEHOLDER_MESSAGE,
};
use crate::convert::build_embed;
use embed_renderer::{
    render_comment, render_secondary, render_submission, ClassifiedSubmission, ContentShape,
};
use reddit_client::{RedditApiClient, RedditUrl};
use redditembed_core::{CoreError, ErrorReporter, Submission};
use serenity::async_trait;
use serenity::builder::{
    CreateAttachment, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, EditInteractionResponse,
};
use serenity::client::{Context, EventHandler};
use serenity::model::application::{Command, CommandInteraction, Interaction};
use serenity::model::channel::{Channel, Message};
use serenity::model::gateway::Ready;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use video_fetch::{FetchOutcome, VideoFetcher, VideoUploadLock};

fn discord_error(e: serenity::Error) -> CoreError {
    CoreError::Discord {
        message: e.to_string(),
    }
}

/// Gateway event handler holding everything a request needs.
pub struct RedditEmbedHandler {
    reddit: Arc<RedditApiClient>,
    videos: Arc<VideoFetcher>,
    video_lock: VideoUploadLock,
    reporter: ErrorReporter,
}

impl RedditEmbedHandler {
    pub fn new(reddit: Arc<RedditApiClient>, videos: Arc<VideoFetcher>) -> Self {
        Self {
            reddit,
            videos,
            video_lock: VideoUploadLock::new(),
            reporter: ErrorReporter::new("discord"),
        }
    }

    async fn respond_ephemeral(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
        content: &str,
    ) -> Result<(), CoreError> {
        let message = CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true);
        command
            .create_response(&ctx.http, CreateInteractionResponse::Message(message))
            .await
            .map_err(discord_error)
    }

    /// Replace a deferred public response with a private one.
    async fn refuse_privately(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
        content: &str,
    ) -> Result<(), CoreError> {
        command
            .delete_response(&ctx.http)
            .await
            .map_err(discord_error)?;
        command
            .create_followup(
                &ctx.http,
                CreateInteractionResponseFollowup::new()
                    .content(content)
                    .ephemeral(true),
            )
            .await
            .map_err(discord_error)?;
        Ok(())
    }

    async fn channel_is_nsfw(&self, ctx: &Context, command: &CommandInteraction) -> bool {
        match command.channel_id.to_channel(&ctx.http).await {
            Ok(Channel::Guild(channel)) => channel.nsfw,
            // Direct messages carry no age restriction.
            Ok(_) => true,
            Err(e) => {
                warn!("Could not look up channel {}: {}", command.channel_id, e);
                false
            }
        }
    }

    async fn handle_reddit(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
    ) -> Result<(), CoreError> {
        let Some(reddit_url) = url_argument(&command.data.options)
            .and_then(|raw| RedditUrl::parse(raw).ok())
        else {
            return self
                .respond_ephemeral(ctx, command, INVALID_URL_MESSAGE)
                .await;
        };

        command.defer(&ctx.http).await.map_err(discord_error)?;

        let result = if reddit_url.is_comment() {
            self.show_comment(ctx, command, &reddit_url).await
        } else {
            self.show_submission(ctx, command, &reddit_url).await
        };

        if let Err(e) = result {
            let message = self.reporter.report_error(&e);
            command
                .edit_response(&ctx.http, EditInteractionResponse::new().content(message))
                .await
                .map_err(discord_error)?;
        }
        Ok(())
    }

    async fn show_comment(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
        reddit_url: &RedditUrl,
    ) -> Result<(), CoreError> {
        let submission = self
            .reddit
            .fetch_submission_by_id(&reddit_url.submission_id)
            .await?;
        if !nsfw_allowed(submission.over_18, self.channel_is_nsfw(ctx, command).await) {
            return self
                .refuse_privately(ctx, command, NSFW_REFUSAL_MESSAGE)
                .await;
        }

        let comment_id = reddit_url
            .comment_id
            .as_deref()
            .ok_or_else(|| CoreError::invalid_input(INVALID_URL_MESSAGE))?;
        let comment = self
            .reddit
            .fetch_comment_by_id(&reddit_url.submission_id, comment_id)
            .await?;
        let author = self.reddit.fetch_user(&comment.author).await?;
        let (content, embed) = render_comment(&comment, &author);

        command
            .edit_response(
                &ctx.http,
                EditInteractionResponse::new()
                    .content(content)
                    .embed(build_embed(&embed)),
            )
            .await
            .map_err(discord_error)?;
        Ok(())
    }

    async fn show_submission(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
        reddit_url: &RedditUrl,
    ) -> Result<(), CoreError> {
        let submission = self
            .reddit
            .fetch_submission_by_id(&reddit_url.submission_id)
            .await?;
        if !nsfw_allowed(submission.over_18, self.channel_is_nsfw(ctx, command).await) {
            return self
                .refuse_privately(ctx, command, NSFW_REFUSAL_MESSAGE)
                .await;
        }

        let author = self.reddit.fetch_user(&submission.author).await?;
        let classified = ClassifiedSubmission::new(&submission);
        info!(
            "Rendering {:?} submission {} from r/{}",
            classified.shape(),
            submission.id,
            submission.subreddit
        );

        let (content, embed) = render_submission(&classified, &author);
        command
            .edit_response(
                &ctx.http,
                EditInteractionResponse::new()
                    .content(content)
                    .embed(build_embed(&embed)),
            )
            .await
            .map_err(discord_error)?;

        if let Some(secondary) = render_secondary(&classified) {
            command
                .create_followup(
                    &ctx.http,
                    CreateInteractionResponseFollowup::new().embed(build_embed(&secondary)),
                )
                .await
                .map_err(discord_error)?;
        }

        if classified.shape() == ContentShape::Video {
            self.upload_video(ctx, command, &submission).await?;
        }
        Ok(())
    }

    async fn upload_video(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
        submission: &Submission,
    ) -> Result<(), CoreError> {
        let placeholder: Message = command
            .create_followup(
                &ctx.http,
                CreateInteractionResponseFollowup::new().content(VIDEO_PLACEHOLDER_MESSAGE),
            )
            .await
            .map_err(discord_error)?;
        let placeholder_id = placeholder.id;
        if self.video_lock.is_busy() {
            info!("Video for {} is queued behind another upload", submission.id);
        }
        let filename = format!("{}.mp4", submission.id);

        let outcome = self
            .videos
            .fetch_video(
                &self.video_lock,
                submission,
                move |file| async move {
                    let attached = match CreateAttachment::file(&file, filename.as_str()).await {
                        Ok(attachment) => attachment,
                        Err(e) => {
                            error!("Could not read muxed video: {}", e);
                            return;
                        }
                    };
                    let edit = CreateInteractionResponseFollowup::new()
                        .content("")
                        .add_file(attached);
                    if let Err(e) = command.edit_followup(&ctx.http, placeholder_id, edit).await {
                        error!("Video upload failed: {}", e);
                    }
                },
                move || async move {
                    if let Err(e) = command.delete_followup(&ctx.http, placeholder_id).await {
                        warn!("Could not remove video placeholder: {}", e);
                    }
                },
            )
            .await;

        debug!("Video fetch for {} finished: {:?}", submission.id, outcome);
        if let FetchOutcome::Delivered { bytes, .. } = outcome {
            info!("Uploaded {} byte video for {}", bytes, submission.id);
        }
        Ok(())
    }

    async fn handle_reddit_info(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
    ) -> Result<(), CoreError> {
        let Some(reddit_url) = url_argument(&command.data.options)
            .and_then(|raw| RedditUrl::parse(raw).ok())
        else {
            return self
                .respond_ephemeral(ctx, command, INVALID_URL_MESSAGE)
                .await;
        };

        command
            .defer_ephemeral(&ctx.http)
            .await
            .map_err(discord_error)?;

        let text = match self
            .reddit
            .fetch_submission_by_id(&reddit_url.submission_id)
            .await
        {
            Ok(submission) => match info_text(&ClassifiedSubmission::new(&submission)) {
                Ok(text) => text,
                Err(e) => self.reporter.report_warning(&e),
            },
            Err(e) => self.reporter.report_error(&e),
        };

        command
            .edit_response(
                &ctx.http,
                EditInteractionResponse::new().content(clamp_content(&text)),
            )
            .await
            .map_err(discord_error)?;
        Ok(())
    }
}

#[async_trait]
impl EventHandler for RedditEmbedHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Connected to Discord as {}", ready.user.name);
        match Command::set_global_commands(&ctx.http, command_definitions()).await {
            Ok(commands) => info!("Registered {} slash commands", commands.len()),
            Err(e) => error!("Failed to register slash commands: {}", e),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        debug!(
            "Received /{} from {} in {}",
            command.data.name, command.user.name, command.channel_id
        );
        let result = match command.data.name.as_str() {
            REDDIT_COMMAND => self.handle_reddit(&ctx, &command).await,
            REDDIT_INFO_COMMAND => self.handle_reddit_info(&ctx, &command).await,
            other => {
                warn!("Ignoring unknown command /{}", other);
                Ok(())
            }
        };

        if let Err(e) = result {
            self.reporter.report_error(&e);
        }
    }
}
