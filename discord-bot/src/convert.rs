use embed_renderer::EmbedDescriptor;
use serenity::builder::{CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter};
use serenity::model::Timestamp;

/// Convert a rendered [`EmbedDescriptor`] into a serenity `CreateEmbed`.
pub fn build_embed(embed: &EmbedDescriptor) -> CreateEmbed {
    let mut builder = CreateEmbed::new().title(&embed.title).color(embed.color);
    if let Some(ref url) = embed.url {
        builder = builder.url(url);
    }
    if let Some(ref description) = embed.description {
        builder = builder.description(description);
    }
    for field in &embed.fields {
        builder = builder.field(&field.name, &field.value, field.inline);
    }
    if let Some(ref author) = embed.author {
        let mut a = CreateEmbedAuthor::new(&author.name);
        if let Some(ref url) = author.url {
            a = a.url(url);
        }
        if let Some(ref icon) = author.icon_url {
            a = a.icon_url(icon);
        }
        builder = builder.author(a);
    }
    if let Some(ref footer) = embed.footer {
        let mut f = CreateEmbedFooter::new(&footer.text);
        if let Some(ref icon) = footer.icon_url {
            f = f.icon_url(icon);
        }
        builder = builder.footer(f);
    }
    if let Some(ref thumbnail) = embed.thumbnail {
        builder = builder.thumbnail(thumbnail);
    }
    if let Some(ref image) = embed.image {
        builder = builder.image(image);
    }
    if let Some(created) = embed.timestamp {
        if let Ok(timestamp) = Timestamp::from_unix_timestamp(created.timestamp()) {
            builder = builder.timestamp(timestamp);
        }
    }
    builder
}
